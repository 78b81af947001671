//! Prosody parameter resolver.
//!
//! Combines a style's baselines, the multiplier set for the requested
//! intensity, and an optional voice calibration into engine-ready values.
//! Resolution is pure: the same request always yields the same result.

mod resolve;
mod types;

pub use resolve::{ProsodyConfig, Resolver};
pub use types::{ResolveError, ResolvedParameters, ResolvedValue};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationTable;
    use crate::config::BuiltinSource;
    use crate::style::{EmphasisLevel, Intensity, InvalidIntensity, Param, StyleCatalog, Unit};

    const STYLES: &str = r#"
defaults:
  style: newscast
  intensity: 3
styles:
  newscast:
    rate: { baseline: "+0%", scale: "+10%" }
    pitch: "+2Hz"
    volume: "+2dB"
    emphasis_strength: moderate
    intensity:
      1: { multiplier: 0.5, rate: 0.5 }
      2: { multiplier: 1.0, rate: 1.0 }
      3: { multiplier: 1.0, rate: 1.5 }
      4: { multiplier: 1.5, rate: 2.0 }
      5: { multiplier: 2.0, rate: 2.5 }
  warm_coach:
    rate: "-5%"
    pitch: "+3Hz"
    volume: "+1dB"
    intensity: { 1: 1.0, 2: 1.2, 3: 1.4, 4: 1.6, 5: 1.8 }
  slow:
    rate: "-20%"
    pitch: "-4Hz"
    volume: "-3dB"
    intensity: { 1: 0.5, 2: 1.0, 3: 1.5, 4: 2.0, 5: 3.0 }
"#;

    const CALIBRATION: &str = r#"
calibrations:
  en-US-GuyNeural:
    adjustments:
      rate_modifier: 1.2
      pitch_modifier: 0.5
  en-US-AriaNeural:
    adjustments:
      emphasis_modifier: 1.5
"#;

    fn resolver() -> Resolver {
        let catalog = StyleCatalog::from_yaml(STYLES).unwrap();
        let calibrations = CalibrationTable::from_yaml(CALIBRATION, 3.0).unwrap();
        Resolver::new(ProsodyConfig::new(catalog, calibrations))
    }

    // ===========================================
    // ResolvedValue formatting
    // ===========================================

    #[test]
    fn test_resolved_value_formats_sign_and_unit() {
        assert_eq!(ResolvedValue::new(15.0, Unit::Percent, 0).to_string(), "+15%");
        assert_eq!(ResolvedValue::new(-3.0, Unit::Hertz, 0).to_string(), "-3Hz");
        assert_eq!(ResolvedValue::new(2.0, Unit::Decibel, 0).to_string(), "+2dB");
        assert_eq!(ResolvedValue::new(1.5, Unit::Strength, 2).to_string(), "+1.50");
    }

    #[test]
    fn test_resolved_value_rounds_to_precision() {
        assert_eq!(ResolvedValue::new(12.4, Unit::Percent, 0).to_string(), "+12%");
        assert_eq!(ResolvedValue::new(-7.26, Unit::Hertz, 1).to_string(), "-7.3Hz");
        assert_eq!(ResolvedValue::new(-7.26, Unit::Hertz, 1).amount(), -7.3);
    }

    #[test]
    fn test_resolved_value_never_renders_negative_zero() {
        assert_eq!(ResolvedValue::new(-0.0, Unit::Percent, 0).to_string(), "+0%");
        assert_eq!(ResolvedValue::new(-0.2, Unit::Decibel, 0).to_string(), "+0dB");
    }

    // ===========================================
    // Resolution
    // ===========================================

    #[test]
    fn test_resolve_scaled_rate() {
        let params = resolver().resolve("newscast", 3, None).unwrap();

        assert_eq!(params.rate.to_string(), "+15%");
        assert_eq!(params.pitch.to_string(), "+2Hz");
        assert_eq!(params.volume.to_string(), "+2dB");
        assert_eq!(params.emphasis.unwrap().to_string(), "+1.00");
        assert_eq!(params.style, "newscast");
        assert_eq!(params.intensity.get(), 3);
        assert!(params.voice.is_none());
    }

    #[test]
    fn test_resolve_all_levels_fully_populated() {
        let resolver = resolver();
        for style in resolver.config().catalog().names() {
            for level in 1..=5 {
                let params = resolver.resolve(style, level, None).unwrap();
                for param in [Param::Rate, Param::Pitch, Param::Volume] {
                    let text = params.get(param).unwrap().to_string();
                    assert!(
                        text.starts_with('+') || text.starts_with('-'),
                        "{style}/{level} {text}"
                    );
                    assert!(text.ends_with(param.unit().suffix()));
                }
            }
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = resolver();
        for style in resolver.config().catalog().names() {
            for level in 1..=5 {
                let first = resolver.resolve(style, level, Some("en-US-GuyNeural")).unwrap();
                let second = resolver.resolve(style, level, Some("en-US-GuyNeural")).unwrap();
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_resolve_rejects_out_of_range_intensity() {
        let resolver = resolver();
        for style in resolver.config().catalog().names() {
            for level in [0, 6, -1, 100] {
                assert_eq!(
                    resolver.resolve(style, level, None).unwrap_err(),
                    ResolveError::InvalidIntensity(InvalidIntensity(level))
                );
            }
        }
    }

    #[test]
    fn test_resolve_unknown_style() {
        let result = resolver().resolve("whisper", 3, None);
        assert_eq!(
            result.unwrap_err(),
            ResolveError::UnknownStyle("whisper".to_string())
        );
    }

    #[test]
    fn test_resolve_near_baseline_at_level_one() {
        let params = resolver().resolve("warm_coach", 1, None).unwrap();

        assert_eq!(params.rate.to_string(), "-5%");
        assert_eq!(params.pitch.to_string(), "+3Hz");
        assert_eq!(params.volume.to_string(), "+1dB");
        assert!(params.emphasis.is_none());
    }

    #[test]
    fn test_resolve_level_five_is_largest() {
        let resolver = resolver();
        let ceiling = resolver.config().catalog().limits().multiplier_ceiling;
        let top = resolver.resolve("slow", 5, None).unwrap();

        for level in 1..5 {
            let params = resolver.resolve("slow", level, None).unwrap();
            assert!(top.rate.amount().abs() >= params.rate.amount().abs());
            assert!(top.volume.amount().abs() >= params.volume.amount().abs());
        }
        assert_eq!(top.rate.to_string(), "-60%");
        assert!(top.rate.amount().abs() <= 20.0 * ceiling);
    }

    // ===========================================
    // Voice calibration
    // ===========================================

    #[test]
    fn test_resolve_calibration_is_multiplicative() {
        let resolver = resolver();
        let plain = resolver.resolve("newscast", 2, None).unwrap();
        let calibrated = resolver
            .resolve("newscast", 2, Some("en-US-GuyNeural"))
            .unwrap();

        assert_eq!(plain.rate.to_string(), "+10%");
        assert_eq!(calibrated.rate.to_string(), "+12%");
        assert_eq!(plain.pitch.to_string(), "+2Hz");
        assert_eq!(calibrated.pitch.to_string(), "+1Hz");
        // volume and emphasis have no adjustment for this voice
        assert_eq!(plain.volume, calibrated.volume);
        assert_eq!(plain.emphasis, calibrated.emphasis);
        assert_eq!(calibrated.voice.as_deref(), Some("en-US-GuyNeural"));
    }

    #[test]
    fn test_resolve_calibration_applies_to_emphasis() {
        let resolver = resolver();
        let plain = resolver.resolve("newscast", 3, None).unwrap();
        let calibrated = resolver
            .resolve("newscast", 3, Some("en-US-AriaNeural"))
            .unwrap();

        assert_eq!(plain.emphasis.unwrap().amount(), 1.0);
        assert_eq!(calibrated.emphasis.unwrap().amount(), 1.5);
        assert_eq!(plain.emphasis_level(), Some(EmphasisLevel::Moderate));
        assert_eq!(calibrated.emphasis_level(), Some(EmphasisLevel::Strong));
    }

    #[test]
    fn test_resolve_uncalibrated_voice_matches_no_voice() {
        let resolver = resolver();
        for style in resolver.config().catalog().names() {
            for level in 1..=5 {
                let plain = resolver.resolve(style, level, None).unwrap();
                let unknown = resolver
                    .resolve(style, level, Some("en-GB-SoniaNeural"))
                    .unwrap();
                assert_eq!(plain.engine_params(), unknown.engine_params());
            }
        }
    }

    #[test]
    fn test_resolve_without_calibration_table() {
        let catalog = StyleCatalog::from_yaml(STYLES).unwrap();
        let resolver = Resolver::new(ProsodyConfig::new(catalog, CalibrationTable::empty()));

        let params = resolver
            .resolve("newscast", 2, Some("en-US-GuyNeural"))
            .unwrap();
        assert_eq!(params.rate.to_string(), "+10%");
    }

    // ===========================================
    // Clamping
    // ===========================================

    #[test]
    fn test_resolve_clamps_to_configured_bounds() {
        let yaml = format!("limits:\n  clamp:\n    rate: [-50, 100]\n{STYLES}");
        let catalog = StyleCatalog::from_yaml(&yaml).unwrap();
        let resolver = Resolver::new(ProsodyConfig::new(catalog, CalibrationTable::empty()));

        let params = resolver.resolve("slow", 5, None).unwrap();
        assert_eq!(params.rate.to_string(), "-50%");
        assert_eq!(params.pitch.to_string(), "-12Hz");
    }

    // ===========================================
    // Defaults
    // ===========================================

    #[test]
    fn test_resolve_or_default_fills_missing_pieces() {
        let resolver = resolver();

        let params = resolver.resolve_or_default(None, None, None).unwrap();
        assert_eq!(params.style, "newscast");
        assert_eq!(params.intensity, Intensity::new(3).unwrap());

        let params = resolver
            .resolve_or_default(Some("warm_coach"), None, None)
            .unwrap();
        assert_eq!(params.style, "warm_coach");
        assert_eq!(params.intensity.get(), 3);

        let params = resolver.resolve_or_default(None, Some(5), None).unwrap();
        assert_eq!(params.rate.to_string(), "+25%");
    }

    #[test]
    fn test_resolve_or_default_without_defaults() {
        let yaml = STYLES.replace("defaults:\n  style: newscast\n  intensity: 3\n", "");
        let catalog = StyleCatalog::from_yaml(&yaml).unwrap();
        let resolver = Resolver::new(ProsodyConfig::new(catalog, CalibrationTable::empty()));

        assert_eq!(
            resolver.resolve_or_default(None, Some(3), None).unwrap_err(),
            ResolveError::NoDefault("style")
        );
        assert_eq!(
            resolver
                .resolve_or_default(Some("newscast"), None, None)
                .unwrap_err(),
            ResolveError::NoDefault("intensity")
        );
    }

    // ===========================================
    // Output shapes
    // ===========================================

    #[test]
    fn test_engine_params_and_json() {
        let params = resolver()
            .resolve("newscast", 3, Some("en-US-JennyNeural"))
            .unwrap();

        let engine = params.engine_params();
        assert_eq!(engine["rate"], "+15%");
        assert_eq!(engine["pitch"], "+2Hz");
        assert_eq!(engine["volume"], "+2dB");
        assert_eq!(engine["emphasis"], "+1.00");

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["style"], "newscast");
        assert_eq!(json["intensity"], 3);
        assert_eq!(json["voice"], "en-US-JennyNeural");
        assert_eq!(json["rate"], "+15%");
    }

    #[test]
    fn test_json_omits_missing_emphasis_and_voice() {
        let params = resolver().resolve("slow", 2, None).unwrap();
        let json = serde_json::to_value(&params).unwrap();

        assert!(json.get("emphasis").is_none());
        assert!(json.get("voice").is_none());
        assert!(params.emphasis_level().is_none());
    }

    // ===========================================
    // Concurrency and bundled configuration
    // ===========================================

    #[test]
    fn test_resolve_from_many_threads() {
        let resolver = resolver();
        let expected = resolver.resolve("newscast", 4, None).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let resolver = resolver.clone();
                let expected = expected.clone();
                scope.spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(resolver.resolve("newscast", 4, None).unwrap(), expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_builtin_config_resolves_every_style() {
        let resolver = Resolver::new(ProsodyConfig::load(&BuiltinSource).unwrap());
        let catalog = resolver.config().catalog();
        let ceiling = catalog.limits().multiplier_ceiling;

        for style in catalog.styles() {
            for level in Intensity::all() {
                for param in Param::ALL {
                    assert!(style.multipliers(level).get(param) <= ceiling);
                }
                assert!(resolver.resolve(&style.name, i64::from(level.get()), None).is_ok());
            }
        }
    }

    #[test]
    fn test_builtin_newscast_example() {
        let resolver = Resolver::new(ProsodyConfig::load(&BuiltinSource).unwrap());
        let params = resolver.resolve("newscast", 3, None).unwrap();
        assert_eq!(params.rate.to_string(), "+15%");
    }

    #[test]
    fn test_builtin_formal_peaks_at_level_five() {
        let resolver = Resolver::new(ProsodyConfig::load(&BuiltinSource).unwrap());
        let catalog = resolver.config().catalog();
        let formal = catalog.get("formal").unwrap();
        let ceiling = catalog.limits().multiplier_ceiling;
        let top_multipliers = formal.multipliers(Intensity::new(5).unwrap());
        let top = resolver.resolve("formal", 5, None).unwrap();

        for param in Param::ALL {
            assert!(top_multipliers.get(param) <= ceiling);
        }

        for level in 1..5 {
            let lower = formal.multipliers(Intensity::new(level).unwrap());
            let params = resolver.resolve("formal", level, None).unwrap();
            for param in Param::ALL {
                assert!(top_multipliers.get(param) > lower.get(param));
                if let (Some(peak), Some(value)) = (top.get(param), params.get(param)) {
                    assert!(peak.amount().abs() >= value.amount().abs());
                }
            }
        }

        assert!(top.emphasis.is_some());
        assert_eq!(top.emphasis_level(), Some(EmphasisLevel::Strong));
    }
}
