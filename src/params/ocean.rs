//! Ocean surface geometry and wave parameters.

use super::{require_finite, require_non_negative, require_nonzero, require_positive};
use crate::error::ConfigError;

/// Ocean surface parameters
#[derive(Debug, Clone)]
pub struct OceanParams {
    /// Edge length of the square ocean plane (meters)
    pub size_m: f32,

    /// Quads per side (vertices per side = segments + 1)
    /// 300 = 90,601 vertices
    pub segments: usize,

    /// Wave amplitude scale `h` (meters)
    /// Peak displacement is h * (0.8 + 0.6)
    pub wave_height_m: f32,

    /// Spatial wave frequency `f` (radians per meter)
    pub wave_frequency: f32,

    /// Colour at the near edge of the plane (0xRRGGBB, sRGB)
    pub deep_color: u32,

    /// Colour at the far edge of the plane (0xRRGGBB, sRGB)
    pub shallow_color: u32,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            size_m: 75.0,
            segments: 300,
            wave_height_m: 1.5,
            wave_frequency: 0.5,
            deep_color: 0x8B8000,    // Dark olive
            shallow_color: 0xFFD700, // Gold
        }
    }
}

impl OceanParams {
    /// Largest segment count whose vertex indices still fit in `u32`
    pub const MAX_SEGMENTS: usize = 65_534;

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("ocean.size_m", self.size_m)?;
        require_nonzero("ocean.segments", self.segments)?;
        if self.segments > Self::MAX_SEGMENTS {
            return Err(ConfigError::TooLarge {
                field: "ocean.segments",
                value: self.segments,
                max: Self::MAX_SEGMENTS,
            });
        }
        require_non_negative("ocean.wave_height_m", self.wave_height_m)?;
        require_finite("ocean.wave_frequency", self.wave_frequency)?;
        require_positive("ocean.wave_frequency", self.wave_frequency)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_frequency_rejected() {
        let params = OceanParams {
            wave_frequency: 0.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::NotPositive {
                field: "ocean.wave_frequency",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_flat_water_allowed() {
        let params = OceanParams {
            wave_height_m: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_segment_bounds() {
        let mut params = OceanParams {
            segments: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        params.segments = OceanParams::MAX_SEGMENTS + 1;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::TooLarge { .. })
        ));
    }
}
