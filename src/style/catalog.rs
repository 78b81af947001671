//! Style catalog: validated style definitions loaded from configuration.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::config::{
    ConfigError, ConfigSource, RawClamp, RawLevel, RawLimits, RawParam, RawStyle, RawValue,
    StylesDocument,
};

use super::delta::{EmphasisLevel, Param, parse_delta};
use super::intensity::Intensity;

const DEFAULT_MULTIPLIER_CEILING: f64 = 3.0;
const DEFAULT_PRECISION: u8 = 0;
const DEFAULT_EMPHASIS_PRECISION: u8 = 2;
const MAX_PRECISION: u8 = 6;
/// Largest baseline or scale magnitude a style may declare.
pub const MAX_DELTA: f64 = 1.0e6;

/// Baseline delta for one parameter, plus an optional scale that is
/// added before the intensity multiplier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamBaseline {
    pub baseline: f64,
    pub scale: f64,
}

impl ParamBaseline {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            scale: 0.0,
        }
    }

    /// The amount the intensity multiplier applies to.
    pub fn magnitude(&self) -> f64 {
        self.baseline + self.scale
    }
}

/// Per-parameter multipliers for a single intensity level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiplierSet {
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
    pub emphasis: f64,
}

impl MultiplierSet {
    pub fn uniform(multiplier: f64) -> Self {
        Self {
            rate: multiplier,
            pitch: multiplier,
            volume: multiplier,
            emphasis: multiplier,
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Rate => self.rate,
            Param::Pitch => self.pitch,
            Param::Volume => self.volume,
            Param::Emphasis => self.emphasis,
        }
    }
}

/// A named speaking style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rate: ParamBaseline,
    pub pitch: ParamBaseline,
    pub volume: ParamBaseline,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<ParamBaseline>,
    levels: [MultiplierSet; Intensity::LEVELS],
}

impl StyleDefinition {
    pub fn baseline(&self, param: Param) -> Option<&ParamBaseline> {
        match param {
            Param::Rate => Some(&self.rate),
            Param::Pitch => Some(&self.pitch),
            Param::Volume => Some(&self.volume),
            Param::Emphasis => self.emphasis.as_ref(),
        }
    }

    pub fn multipliers(&self, intensity: Intensity) -> &MultiplierSet {
        &self.levels[intensity.index()]
    }

    pub fn levels(&self) -> &[MultiplierSet; Intensity::LEVELS] {
        &self.levels
    }

    fn from_raw(name: &str, raw: RawStyle, ceiling: f64) -> Result<Self, ConfigError> {
        let rate = required_param(name, Param::Rate, raw.rate)?;
        let pitch = required_param(name, Param::Pitch, raw.pitch)?;
        let volume = required_param(name, Param::Volume, raw.volume)?;
        let emphasis = raw
            .emphasis_strength
            .map(|param| parse_param(name, Param::Emphasis, param))
            .transpose()?;

        let raw_levels = raw.intensity.ok_or_else(|| ConfigError::MissingField {
            style: name.to_string(),
            field: "intensity",
        })?;
        let levels = parse_levels(name, raw_levels, ceiling)?;

        Ok(Self {
            name: name.to_string(),
            description: raw.description,
            rate,
            pitch,
            volume,
            emphasis,
            levels,
        })
    }
}

/// Numeric limits applied during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    pub multiplier_ceiling: f64,
    pub precision: u8,
    pub emphasis_precision: u8,
    clamp: BTreeMap<Param, (f64, f64)>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            multiplier_ceiling: DEFAULT_MULTIPLIER_CEILING,
            precision: DEFAULT_PRECISION,
            emphasis_precision: DEFAULT_EMPHASIS_PRECISION,
            clamp: BTreeMap::new(),
        }
    }
}

impl Limits {
    pub fn precision_for(&self, param: Param) -> u8 {
        match param {
            Param::Emphasis => self.emphasis_precision,
            _ => self.precision,
        }
    }

    /// Bounds for the final value of `param`, if any are configured.
    pub fn clamp_for(&self, param: Param) -> Option<(f64, f64)> {
        self.clamp.get(&param).copied()
    }

    fn from_raw(raw: RawLimits) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let multiplier_ceiling = raw
            .multiplier_ceiling
            .unwrap_or(defaults.multiplier_ceiling);
        if !multiplier_ceiling.is_finite() || multiplier_ceiling <= 0.0 {
            return Err(ConfigError::InvalidLimits(format!(
                "multiplier_ceiling must be a positive number, got {multiplier_ceiling}"
            )));
        }

        let precision = raw.precision.unwrap_or(defaults.precision);
        let emphasis_precision = raw
            .emphasis_precision
            .unwrap_or(defaults.emphasis_precision);
        for value in [precision, emphasis_precision] {
            if value > MAX_PRECISION {
                return Err(ConfigError::InvalidLimits(format!(
                    "precision must be at most {MAX_PRECISION}, got {value}"
                )));
            }
        }

        Ok(Self {
            multiplier_ceiling,
            precision,
            emphasis_precision,
            clamp: parse_clamp(raw.clamp)?,
        })
    }
}

/// Style and intensity used when the caller does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub style: String,
    pub intensity: Intensity,
}

/// All styles from one style document, validated and read-only.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: BTreeMap<String, StyleDefinition>,
    limits: Limits,
    defaults: Option<Defaults>,
}

impl StyleCatalog {
    /// Read and validate the style document from `source`.
    pub fn load(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let yaml = source.styles()?;
        let catalog = Self::from_yaml(&yaml)?;
        info!(
            source = %source.describe(),
            styles = catalog.len(),
            "loaded prosody styles"
        );
        Ok(catalog)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_document(StylesDocument::from_yaml(yaml)?)
    }

    pub fn from_document(doc: StylesDocument) -> Result<Self, ConfigError> {
        if doc.styles.is_empty() {
            return Err(ConfigError::NoStyles);
        }

        let limits = Limits::from_raw(doc.limits)?;

        let mut styles = BTreeMap::new();
        for (name, raw) in doc.styles {
            let style = StyleDefinition::from_raw(&name, raw, limits.multiplier_ceiling)?;
            styles.insert(name, style);
        }

        let defaults = match doc.defaults {
            Some(raw) => {
                if !styles.contains_key(&raw.style) {
                    return Err(ConfigError::UnknownDefaultStyle(raw.style));
                }
                let intensity = Intensity::new(raw.intensity)
                    .map_err(|e| ConfigError::InvalidDefaultIntensity(e.0))?;
                Some(Defaults {
                    style: raw.style,
                    intensity,
                })
            }
            None => None,
        };

        Ok(Self {
            styles,
            limits,
            defaults,
        })
    }

    /// Style names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.values()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn defaults(&self) -> Option<&Defaults> {
        self.defaults.as_ref()
    }
}

fn required_param(
    style: &str,
    param: Param,
    raw: Option<RawParam>,
) -> Result<ParamBaseline, ConfigError> {
    let raw = raw.ok_or_else(|| ConfigError::MissingField {
        style: style.to_string(),
        field: param.config_key(),
    })?;
    parse_param(style, param, raw)
}

fn parse_param(style: &str, param: Param, raw: RawParam) -> Result<ParamBaseline, ConfigError> {
    match raw {
        RawParam::Baseline(value) => Ok(ParamBaseline::new(parse_value(style, param, &value)?)),
        RawParam::Scaled(scaled) => {
            let baseline = scaled
                .baseline
                .map(|value| parse_value(style, param, &value))
                .transpose()?
                .unwrap_or(0.0);
            let scale = scaled
                .scale
                .map(|value| parse_value(style, param, &value))
                .transpose()?
                .unwrap_or(0.0);
            Ok(ParamBaseline { baseline, scale })
        }
    }
}

fn parse_value(style: &str, param: Param, value: &RawValue) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        style: style.to_string(),
        param: param.config_key(),
        value: value.to_string(),
        reason,
    };

    let parsed = match value {
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) => return Err(invalid("value must be finite".to_string())),
        RawValue::Text(text) => {
            if param == Param::Emphasis
                && let Some(level) = EmphasisLevel::from_name(text)
            {
                return Ok(level.strength());
            }
            parse_delta(text, param.unit()).map_err(&invalid)?
        }
    };

    if parsed.abs() > MAX_DELTA {
        return Err(invalid(format!("magnitude must be at most {MAX_DELTA}")));
    }
    Ok(parsed)
}

fn parse_levels(
    style: &str,
    raw: BTreeMap<u8, RawLevel>,
    ceiling: f64,
) -> Result<[MultiplierSet; Intensity::LEVELS], ConfigError> {
    if let Some(&level) = raw
        .keys()
        .find(|level| Intensity::new(i64::from(**level)).is_err())
    {
        return Err(ConfigError::UnexpectedLevel {
            style: style.to_string(),
            level,
        });
    }

    let mut levels = [MultiplierSet::uniform(1.0); Intensity::LEVELS];
    for intensity in Intensity::all() {
        let level = intensity.get();
        let entry = raw.get(&level).ok_or_else(|| ConfigError::MissingLevel {
            style: style.to_string(),
            level,
        })?;

        let set = match entry {
            RawLevel::Uniform(multiplier) => MultiplierSet::uniform(*multiplier),
            RawLevel::PerParam(set) => {
                let pick = |value: Option<f64>, param: Param| {
                    value
                        .or(set.multiplier)
                        .ok_or_else(|| ConfigError::IncompleteMultiplierSet {
                            style: style.to_string(),
                            level,
                            param: param.as_str(),
                        })
                };
                MultiplierSet {
                    rate: pick(set.rate, Param::Rate)?,
                    pitch: pick(set.pitch, Param::Pitch)?,
                    volume: pick(set.volume, Param::Volume)?,
                    emphasis: pick(set.emphasis, Param::Emphasis)?,
                }
            }
        };

        for param in Param::ALL {
            check_multiplier(
                || format!("style '{style}' intensity {level} {}", param.as_str()),
                set.get(param),
                ceiling,
            )?;
        }
        levels[intensity.index()] = set;
    }
    Ok(levels)
}

/// Reject negative, non-finite, or above-ceiling multipliers.
pub(crate) fn check_multiplier(
    context: impl FnOnce() -> String,
    value: f64,
    ceiling: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=ceiling).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::MultiplierOutOfBounds {
            context: context(),
            value,
            ceiling,
        })
    }
}

fn parse_clamp(raw: RawClamp) -> Result<BTreeMap<Param, (f64, f64)>, ConfigError> {
    let mut clamp = BTreeMap::new();
    let entries = [
        (Param::Rate, raw.rate),
        (Param::Pitch, raw.pitch),
        (Param::Volume, raw.volume),
        (Param::Emphasis, raw.emphasis),
    ];
    for (param, bounds) in entries {
        let Some([min, max]) = bounds else {
            continue;
        };
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidLimits(format!(
                "clamp for {} must be [min, max] with min <= max, got [{min}, {max}]",
                param.as_str()
            )));
        }
        clamp.insert(param, (min, max));
    }
    Ok(clamp)
}
