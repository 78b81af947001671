//! Configuration sources and raw YAML documents.
//!
//! Style and calibration documents are read through a [`ConfigSource`]
//! and parsed into the raw types here; validation into typed tables
//! happens in the `style` and `calibration` modules.

mod source;
mod types;

#[cfg(test)]
pub use source::MockConfigSource;
pub use source::{
    BuiltinSource, CALIBRATION_FILE, ConfigSource, DirSource, STYLES_FILE, select_source,
};
pub use types::{
    CalibrationDocument, ConfigError, RawCalibration, RawClamp, RawDefaults, RawLevel,
    RawLevelSet, RawLimits, RawParam, RawScaled, RawStyle, RawValue, StylesDocument,
};
