//! Style catalog: named speaking styles and their intensity tables.
//!
//! Each style carries baseline deltas for rate, pitch and volume (plus an
//! optional emphasis strength) and a multiplier set for every intensity
//! level from 1 to 5.

mod catalog;
mod delta;
mod intensity;

pub(crate) use catalog::check_multiplier;
pub use catalog::{
    Defaults, Limits, MAX_DELTA, MultiplierSet, ParamBaseline, StyleCatalog, StyleDefinition,
};
pub use delta::{EmphasisLevel, Param, Unit, parse_delta};
pub use intensity::{Intensity, InvalidIntensity};
