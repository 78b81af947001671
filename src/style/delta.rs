//! Prosody parameters, their units, and delta parsing.

use serde::Serialize;

/// A tunable prosody parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Param {
    Rate,
    Pitch,
    Volume,
    Emphasis,
}

impl Param {
    pub const ALL: [Param; 4] = [Param::Rate, Param::Pitch, Param::Volume, Param::Emphasis];

    pub fn as_str(&self) -> &'static str {
        match self {
            Param::Rate => "rate",
            Param::Pitch => "pitch",
            Param::Volume => "volume",
            Param::Emphasis => "emphasis",
        }
    }

    /// Field name used in the style document.
    pub fn config_key(&self) -> &'static str {
        match self {
            Param::Emphasis => "emphasis_strength",
            other => other.as_str(),
        }
    }

    /// Key used for this parameter in the calibration document.
    pub fn adjustment_key(&self) -> &'static str {
        match self {
            Param::Rate => "rate_modifier",
            Param::Pitch => "pitch_modifier",
            Param::Volume => "volume_modifier",
            Param::Emphasis => "emphasis_modifier",
        }
    }

    pub fn from_adjustment_key(key: &str) -> Option<Param> {
        Param::ALL
            .into_iter()
            .find(|param| param.adjustment_key() == key)
    }

    pub fn unit(&self) -> Unit {
        match self {
            Param::Rate => Unit::Percent,
            Param::Pitch => Unit::Hertz,
            Param::Volume => Unit::Decibel,
            Param::Emphasis => Unit::Strength,
        }
    }
}

/// Unit attached to a parameter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Percent,
    Hertz,
    Decibel,
    /// Dimensionless emphasis strength.
    Strength,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Hertz => "Hz",
            Unit::Decibel => "dB",
            Unit::Strength => "",
        }
    }
}

/// Parse a signed delta such as `"+10%"`, `"-3Hz"` or `"2"`.
///
/// The unit suffix is optional but, when present, must match `unit`
/// (compared case-insensitively).
pub fn parse_delta(input: &str, unit: Unit) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    let number = strip_unit(trimmed, unit).trim();

    let value: f64 = match number.parse() {
        Ok(value) => value,
        Err(_) => {
            let unit_start = number
                .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
                .len();
            let found = &number[unit_start..];
            return Err(match unit {
                _ if found.is_empty() => format!("'{number}' is not a number"),
                Unit::Strength => format!("expected a plain number, found unit '{found}'"),
                _ => format!("expected unit '{}', found '{found}'", unit.suffix()),
            });
        }
    };

    if !value.is_finite() {
        return Err("value must be finite".to_string());
    }
    Ok(value)
}

/// Drop a trailing `unit` suffix, matched case-insensitively.
fn strip_unit(text: &str, unit: Unit) -> &str {
    let suffix = unit.suffix();
    let Some(start) = text.len().checked_sub(suffix.len()) else {
        return text;
    };
    match text.get(start..) {
        Some(tail) if !suffix.is_empty() && tail.eq_ignore_ascii_case(suffix) => &text[..start],
        _ => text,
    }
}

/// SSML emphasis level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisLevel {
    None,
    Reduced,
    Moderate,
    Strong,
}

impl EmphasisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmphasisLevel::None => "none",
            EmphasisLevel::Reduced => "reduced",
            EmphasisLevel::Moderate => "moderate",
            EmphasisLevel::Strong => "strong",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(EmphasisLevel::None),
            "reduced" => Some(EmphasisLevel::Reduced),
            "moderate" => Some(EmphasisLevel::Moderate),
            "strong" => Some(EmphasisLevel::Strong),
            _ => None,
        }
    }

    /// Numeric strength a named level stands for in style documents.
    pub fn strength(&self) -> f64 {
        match self {
            EmphasisLevel::None => 0.0,
            EmphasisLevel::Reduced => 0.5,
            EmphasisLevel::Moderate => 1.0,
            EmphasisLevel::Strong => 1.5,
        }
    }

    /// Nearest level for a resolved strength.
    pub fn from_strength(strength: f64) -> Self {
        if strength < 0.25 {
            EmphasisLevel::None
        } else if strength < 0.75 {
            EmphasisLevel::Reduced
        } else if strength < 1.25 {
            EmphasisLevel::Moderate
        } else {
            EmphasisLevel::Strong
        }
    }
}
