//! Per-voice calibration layered on top of style scaling.
//!
//! Adjustments are multiplicative: a factor of 1.0 leaves a parameter
//! unchanged, and voices without an entry are not adjusted at all.

mod table;

pub use table::{CalibrationTable, VoiceCalibration};
