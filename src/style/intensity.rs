//! Intensity levels.

use serde::Serialize;
use thiserror::Error;

/// Raised for an intensity outside 1..=5. Never clamped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid intensity {0}: expected an integer from 1 to 5")]
pub struct InvalidIntensity(pub i64);

/// A validated intensity level from 1 (subtle) to 5 (strongest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Number of levels every style must define.
    pub const LEVELS: usize = 5;

    pub fn new(value: i64) -> Result<Self, InvalidIntensity> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidIntensity(value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based position in a style's multiplier table.
    pub fn index(&self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    pub fn all() -> impl Iterator<Item = Intensity> {
        (Self::MIN..=Self::MAX).map(Intensity)
    }
}

impl TryFrom<i64> for Intensity {
    type Error = InvalidIntensity;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
