//! Resolver output and errors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::style::{EmphasisLevel, Intensity, InvalidIntensity, Param, Unit};

/// Errors that can occur when resolving a style.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error(transparent)]
    InvalidIntensity(#[from] InvalidIntensity),

    #[error("No default {0} configured")]
    NoDefault(&'static str),
}

/// A final parameter value, rounded and tagged with its unit.
///
/// Displays as an explicitly signed delta such as `+15%` or `-3Hz`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedValue {
    amount: f64,
    unit: Unit,
    precision: u8,
}

impl ResolvedValue {
    /// Round `amount` to `precision` decimals.
    pub fn new(amount: f64, unit: Unit, precision: u8) -> Self {
        Self {
            amount: round_to(amount, precision),
            unit,
            precision,
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:+.*}{}",
            self.precision as usize,
            self.amount,
            self.unit.suffix()
        )
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn round_to(amount: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    let rounded = (amount * factor).round() / factor;
    // Avoid rendering "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Concrete prosody parameters for one (style, intensity, voice) request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameters {
    pub style: String,
    pub intensity: Intensity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    pub rate: ResolvedValue,
    pub pitch: ResolvedValue,
    pub volume: ResolvedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<ResolvedValue>,
}

impl ResolvedParameters {
    pub fn get(&self, param: Param) -> Option<&ResolvedValue> {
        match param {
            Param::Rate => Some(&self.rate),
            Param::Pitch => Some(&self.pitch),
            Param::Volume => Some(&self.volume),
            Param::Emphasis => self.emphasis.as_ref(),
        }
    }

    /// Parameter name to formatted value, as handed to an engine adapter.
    pub fn engine_params(&self) -> BTreeMap<&'static str, String> {
        Param::ALL
            .into_iter()
            .filter_map(|param| {
                self.get(param)
                    .map(|value| (param.as_str(), value.to_string()))
            })
            .collect()
    }

    /// SSML emphasis level for the resolved strength, if the style has one.
    pub fn emphasis_level(&self) -> Option<EmphasisLevel> {
        self.emphasis
            .map(|value| EmphasisLevel::from_strength(value.amount()))
    }
}
