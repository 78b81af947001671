//! Parameter resolution.

use std::sync::Arc;

use tracing::debug;

use crate::calibration::{CalibrationTable, VoiceCalibration};
use crate::config::{ConfigError, ConfigSource};
use crate::style::{Intensity, MultiplierSet, Param, ParamBaseline, StyleCatalog, StyleDefinition};

use super::types::{ResolveError, ResolvedParameters, ResolvedValue};

/// Immutable style and calibration tables, loaded once.
#[derive(Debug, Clone)]
pub struct ProsodyConfig {
    catalog: StyleCatalog,
    calibrations: CalibrationTable,
}

impl ProsodyConfig {
    pub fn new(catalog: StyleCatalog, calibrations: CalibrationTable) -> Self {
        Self {
            catalog,
            calibrations,
        }
    }

    /// Load both documents from `source`. Calibration factors share the
    /// style multiplier ceiling.
    pub fn load(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let catalog = StyleCatalog::load(source)?;
        let calibrations =
            CalibrationTable::load(source, catalog.limits().multiplier_ceiling)?;
        Ok(Self::new(catalog, calibrations))
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub fn calibrations(&self) -> &CalibrationTable {
        &self.calibrations
    }
}

/// Turns (style, intensity, voice) requests into concrete parameters.
///
/// Cloning is cheap and clones share the same configuration, so one
/// resolver can serve many threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<ProsodyConfig>,
}

impl Resolver {
    pub fn new(config: ProsodyConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ProsodyConfig {
        &self.config
    }

    /// Resolve `style` at `intensity`, calibrated for `voice` when the
    /// calibration table has an entry for it.
    ///
    /// For each parameter the result is
    /// `(baseline + scale) * multiplier * calibration`, clamped if the
    /// catalog configures bounds, then rounded.
    pub fn resolve(
        &self,
        style: &str,
        intensity: i64,
        voice: Option<&str>,
    ) -> Result<ResolvedParameters, ResolveError> {
        let definition = self
            .config
            .catalog
            .get(style)
            .ok_or_else(|| ResolveError::UnknownStyle(style.to_string()))?;
        let intensity = Intensity::new(intensity)?;
        Ok(self.resolve_definition(definition, intensity, voice))
    }

    /// Resolve with the catalog defaults filling in a missing style or intensity.
    pub fn resolve_or_default(
        &self,
        style: Option<&str>,
        intensity: Option<i64>,
        voice: Option<&str>,
    ) -> Result<ResolvedParameters, ResolveError> {
        let defaults = self.config.catalog.defaults();
        let style = match style {
            Some(style) => style,
            None => defaults
                .map(|d| d.style.as_str())
                .ok_or(ResolveError::NoDefault("style"))?,
        };
        let intensity = match intensity {
            Some(intensity) => intensity,
            None => defaults
                .map(|d| i64::from(d.intensity.get()))
                .ok_or(ResolveError::NoDefault("intensity"))?,
        };
        self.resolve(style, intensity, voice)
    }

    fn resolve_definition(
        &self,
        definition: &StyleDefinition,
        intensity: Intensity,
        voice: Option<&str>,
    ) -> ResolvedParameters {
        let multipliers = definition.multipliers(intensity);
        let calibration = voice.and_then(|id| self.config.calibrations.get(id));
        if let (Some(id), None) = (voice, calibration) {
            debug!(voice = id, "voice has no calibration");
        }

        let value = |param: Param, base: &ParamBaseline| {
            self.scale(param, base, multipliers, calibration)
        };

        let params = ResolvedParameters {
            style: definition.name.clone(),
            intensity,
            voice: voice.map(str::to_string),
            rate: value(Param::Rate, &definition.rate),
            pitch: value(Param::Pitch, &definition.pitch),
            volume: value(Param::Volume, &definition.volume),
            emphasis: definition
                .emphasis
                .as_ref()
                .map(|base| value(Param::Emphasis, base)),
        };

        debug!(
            style = %params.style,
            intensity = %params.intensity,
            rate = %params.rate,
            pitch = %params.pitch,
            volume = %params.volume,
            "resolved prosody"
        );
        params
    }

    fn scale(
        &self,
        param: Param,
        base: &ParamBaseline,
        multipliers: &MultiplierSet,
        calibration: Option<&VoiceCalibration>,
    ) -> ResolvedValue {
        let limits = self.config.catalog.limits();

        let scaled = base.magnitude() * multipliers.get(param);
        let calibrated = scaled * calibration.map_or(1.0, |c| c.factor(param));
        let bounded = match limits.clamp_for(param) {
            Some((min, max)) => calibrated.clamp(min, max),
            None => calibrated,
        };

        ResolvedValue::new(bounded, param.unit(), limits.precision_for(param))
    }
}
