//! prosody-rs: speaking-style resolution for text-to-speech engines.
//!
//! This crate maps named speaking styles and intensity levels (1-5) onto the
//! rate, pitch, volume and emphasis values a TTS engine consumes, with optional
//! per-voice calibration and SSML output. It does not synthesize audio.

pub mod calibration;
pub mod cli;
pub mod config;
pub mod resolver;
pub mod ssml;
pub mod style;
