//! Voice calibration table.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::config::{CalibrationDocument, ConfigError, ConfigSource};
use crate::style::{Param, check_multiplier};

/// Multiplicative per-parameter corrections for one voice.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCalibration {
    pub voice: String,
    pub description: Option<String>,
    factors: BTreeMap<Param, f64>,
}

impl VoiceCalibration {
    /// The declared adjustment for `param`, if any.
    pub fn adjustment(&self, param: Param) -> Option<f64> {
        self.factors.get(&param).copied()
    }

    /// The factor applied to `param`; 1.0 when none is declared.
    pub fn factor(&self, param: Param) -> f64 {
        self.adjustment(param).unwrap_or(1.0)
    }

    pub fn adjustments(&self) -> impl Iterator<Item = (Param, f64)> + '_ {
        self.factors.iter().map(|(param, factor)| (*param, *factor))
    }
}

/// Calibrations keyed by voice id.
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
    voices: BTreeMap<String, VoiceCalibration>,
}

impl CalibrationTable {
    /// A table with no calibrations; every voice resolves uncalibrated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the optional calibration document from `source`.
    ///
    /// A missing document yields an empty table. Factors are bounded by
    /// `ceiling`, the style multiplier ceiling.
    pub fn load(source: &dyn ConfigSource, ceiling: f64) -> Result<Self, ConfigError> {
        let Some(yaml) = source.calibrations()? else {
            warn!(source = %source.describe(), "no voice calibration found, using uncalibrated values");
            return Ok(Self::empty());
        };
        let table = Self::from_yaml(&yaml, ceiling)?;
        info!(
            source = %source.describe(),
            voices = table.len(),
            "loaded voice calibrations"
        );
        Ok(table)
    }

    pub fn from_yaml(yaml: &str, ceiling: f64) -> Result<Self, ConfigError> {
        Self::from_document(CalibrationDocument::from_yaml(yaml)?, ceiling)
    }

    pub fn from_document(doc: CalibrationDocument, ceiling: f64) -> Result<Self, ConfigError> {
        let mut voices = BTreeMap::new();
        for (voice, raw) in doc.calibrations {
            let mut factors = BTreeMap::new();
            for (key, factor) in raw.adjustments {
                let param = Param::from_adjustment_key(&key).ok_or_else(|| {
                    ConfigError::UnknownAdjustment {
                        voice: voice.clone(),
                        key: key.clone(),
                    }
                })?;
                check_multiplier(|| format!("voice '{voice}' {key}"), factor, ceiling)?;
                factors.insert(param, factor);
            }
            let calibration = VoiceCalibration {
                voice: voice.clone(),
                description: raw.description,
                factors,
            };
            voices.insert(voice, calibration);
        }
        Ok(Self { voices })
    }

    pub fn get(&self, voice: &str) -> Option<&VoiceCalibration> {
        self.voices.get(voice)
    }

    /// Voice ids with a calibration, in sorted order.
    pub fn voices(&self) -> Vec<&str> {
        self.voices.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
