//! Where configuration documents come from.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::ConfigError;

/// File name of the style document inside a config directory.
pub const STYLES_FILE: &str = "styles.yaml";

/// File name of the optional calibration document inside a config directory.
pub const CALIBRATION_FILE: &str = "calibration.yaml";

const BUILTIN_STYLES: &str = include_str!("../../config/styles.yaml");
const BUILTIN_CALIBRATION: &str = include_str!("../../config/calibration.yaml");

/// Trait for reading raw configuration documents.
///
/// Loading is split from parsing so catalogs can be built from disk,
/// from the embedded defaults, or from mocks in tests.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    /// Human-readable origin used in log lines.
    fn describe(&self) -> String;

    /// Read the style document.
    fn styles(&self) -> Result<String, ConfigError>;

    /// Read the calibration document, or `None` when there is none.
    fn calibrations(&self) -> Result<Option<String>, ConfigError>;
}

/// Reads `styles.yaml` and `calibration.yaml` from a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user config directory (`<config dir>/prosody-rs`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("prosody-rs"))
    }

    /// The per-user source, if its directory holds a style document.
    pub fn discover() -> Option<Self> {
        let source = Self::new(Self::default_dir()?);
        source.styles_path().is_file().then_some(source)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn styles_path(&self) -> PathBuf {
        self.dir.join(STYLES_FILE)
    }

    pub fn calibration_path(&self) -> PathBuf {
        self.dir.join(CALIBRATION_FILE)
    }
}

impl ConfigSource for DirSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn styles(&self) -> Result<String, ConfigError> {
        let path = self.styles_path();
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })
    }

    fn calibrations(&self) -> Result<Option<String>, ConfigError> {
        let path = self.calibration_path();
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no calibration file");
                Ok(None)
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }
}

/// The style and calibration documents shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl ConfigSource for BuiltinSource {
    fn describe(&self) -> String {
        "built-in".to_string()
    }

    fn styles(&self) -> Result<String, ConfigError> {
        Ok(BUILTIN_STYLES.to_string())
    }

    fn calibrations(&self) -> Result<Option<String>, ConfigError> {
        Ok(Some(BUILTIN_CALIBRATION.to_string()))
    }
}

/// Pick a configuration source.
///
/// An explicit directory wins, then the per-user directory, then the
/// built-in documents.
pub fn select_source(explicit: Option<&Path>) -> Box<dyn ConfigSource> {
    if let Some(dir) = explicit {
        return Box::new(DirSource::new(dir));
    }
    match DirSource::discover() {
        Some(source) => Box::new(source),
        None => Box::new(BuiltinSource),
    }
}
