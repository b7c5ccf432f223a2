//! Parameter definitions with physical units and documented semantics.
//!
//! All scene constants live here with:
//! - Units (meters, seconds, radians, per-frame steps)
//! - Defaults matching the reference vignette
//! - Validation that rejects malformed values instead of clamping them

mod ocean;
mod orbit;
mod rain;
mod render;

use crate::error::ConfigError;

// Re-export all types
pub use ocean::OceanParams;
pub use orbit::{LightParams, OrbitParams, PropParams};
pub use rain::RainParams;
pub use render::{RecordingConfig, RenderConfig, SkyParams};

/// Complete scene configuration, validated as a unit before start-up
#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub ocean: OceanParams,
    pub rain: RainParams,
    pub light: LightParams,
    pub prop: PropParams,
    pub sky: SkyParams,
    pub render: RenderConfig,

    /// Frame capture mode (None = interactive, runs until the window closes)
    pub recording: Option<RecordingConfig>,

    /// Seed for the rain field (None = fresh entropy every run)
    pub seed: Option<u64>,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ocean.validate()?;
        self.rain.validate()?;
        self.light.validate()?;
        self.prop.validate()?;
        self.sky.validate()?;
        self.render.validate()?;
        if let Some(recording) = &self.recording {
            recording.validate()?;
        }
        Ok(())
    }
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB floats.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn require_nonzero(field: &'static str, count: usize) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::Empty { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_srgb_conversion_endpoints() {
        assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        assert_eq!(srgb_hex_to_linear(0xFFFFFF), [1.0, 1.0, 1.0]);

        // Pure red keeps its channels separate
        let red = srgb_hex_to_linear(0xFF0000);
        assert_eq!(red, [1.0, 0.0, 0.0]);

        // Mid grey is darker in linear space
        let grey = srgb_hex_to_linear(0x808080);
        assert!(grey[0] > 0.2 && grey[0] < 0.23);
    }

    #[test]
    fn test_nested_errors_surface() {
        let mut config = SceneConfig::default();
        config.rain.count = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Empty {
                field: "rain.count"
            })
        );

        let mut config = SceneConfig::default();
        config.recording = Some(RecordingConfig::new(-1.0));
        assert!(config.validate().is_err());
    }
}
