//! Configuration documents and load errors.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading style or calibration configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No styles defined")]
    NoStyles,

    #[error("Style '{style}' is missing required field '{field}'")]
    MissingField { style: String, field: &'static str },

    #[error("Style '{style}' has no multiplier for intensity level {level}")]
    MissingLevel { style: String, level: u8 },

    #[error("Style '{style}' declares unsupported intensity level {level}")]
    UnexpectedLevel { style: String, level: u8 },

    #[error("Style '{style}' intensity {level} leaves '{param}' without a multiplier")]
    IncompleteMultiplierSet {
        style: String,
        level: u8,
        param: &'static str,
    },

    #[error("Multiplier {value} for {context} is outside 0..={ceiling}")]
    MultiplierOutOfBounds {
        context: String,
        value: f64,
        ceiling: f64,
    },

    #[error("Invalid {param} value '{value}' in style '{style}': {reason}")]
    InvalidValue {
        style: String,
        param: &'static str,
        value: String,
        reason: String,
    },

    #[error("Voice '{voice}' has unknown adjustment '{key}'")]
    UnknownAdjustment { voice: String, key: String },

    #[error("Invalid limits: {0}")]
    InvalidLimits(String),

    #[error("Default style '{0}' is not defined")]
    UnknownDefaultStyle(String),

    #[error("Default intensity {0} is outside 1..=5")]
    InvalidDefaultIntensity(i64),
}

/// Top-level style document (`styles.yaml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StylesDocument {
    #[serde(default)]
    pub defaults: Option<RawDefaults>,
    #[serde(default)]
    pub limits: RawLimits,
    #[serde(default)]
    pub styles: BTreeMap<String, RawStyle>,
}

/// Default style and intensity used when a caller names neither.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDefaults {
    pub style: String,
    #[serde(default = "default_intensity")]
    pub intensity: i64,
}

fn default_intensity() -> i64 {
    3
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLimits {
    pub multiplier_ceiling: Option<f64>,
    pub precision: Option<u8>,
    pub emphasis_precision: Option<u8>,
    #[serde(default)]
    pub clamp: RawClamp,
}

/// Optional `[min, max]` bounds on final parameter values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawClamp {
    pub rate: Option<[f64; 2]>,
    pub pitch: Option<[f64; 2]>,
    pub volume: Option<[f64; 2]>,
    pub emphasis: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStyle {
    pub description: Option<String>,
    pub rate: Option<RawParam>,
    pub pitch: Option<RawParam>,
    pub volume: Option<RawParam>,
    pub emphasis_strength: Option<RawParam>,
    pub intensity: Option<BTreeMap<u8, RawLevel>>,
}

/// A scalar as written in YAML: either a bare number or a string such as `"+10%"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// A parameter baseline, optionally with an intensity scale on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawParam {
    Baseline(RawValue),
    Scaled(RawScaled),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScaled {
    pub baseline: Option<RawValue>,
    pub scale: Option<RawValue>,
}

/// Multipliers for one intensity level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLevel {
    Uniform(f64),
    PerParam(RawLevelSet),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLevelSet {
    pub multiplier: Option<f64>,
    pub rate: Option<f64>,
    pub pitch: Option<f64>,
    pub volume: Option<f64>,
    pub emphasis: Option<f64>,
}

/// Top-level calibration document (`calibration.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationDocument {
    #[serde(default)]
    pub calibrations: BTreeMap<String, RawCalibration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCalibration {
    pub description: Option<String>,
    #[serde(default)]
    pub adjustments: BTreeMap<String, f64>,
}

impl StylesDocument {
    /// Parse a style document from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            document: "styles",
            source,
        })
    }
}

impl CalibrationDocument {
    /// Parse a calibration document from YAML. Blank input yields an empty table.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            document: "calibration",
            source,
        })
    }
}
