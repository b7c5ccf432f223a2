//! Rain particle field parameters.

use super::{require_non_negative, require_nonzero, require_positive};
use crate::error::ConfigError;

/// Rain field parameters
///
/// Fall speeds are per-frame steps, not per-second rates: the field advances
/// once per rendered frame regardless of frame duration.
#[derive(Debug, Clone)]
pub struct RainParams {
    /// Number of drops (fixed for the process lifetime)
    pub count: usize,

    /// Drops spawn with x, z in [-half_extent, half_extent] (meters)
    pub half_extent_m: f32,

    /// Ceiling a drop is recycled to after passing y = 0 (meters)
    pub spawn_height_m: f32,

    /// Slowest fall step (meters per frame)
    pub min_fall_speed: f32,

    /// Random extra fall step on top of the minimum, drawn from [0, jitter)
    pub fall_speed_jitter: f32,

    /// Billboard edge length (meters)
    pub drop_size_m: f32,

    /// Drop colour (0xRRGGBB, sRGB)
    pub color: u32,

    /// Drop opacity in [0, 1]
    pub opacity: f32,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            half_extent_m: 50.0,
            spawn_height_m: 50.0,
            min_fall_speed: 0.2,
            fall_speed_jitter: 0.5,
            drop_size_m: 0.2,
            color: 0xFF0000,
            opacity: 0.8,
        }
    }
}

impl RainParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("rain.count", self.count)?;
        require_positive("rain.half_extent_m", self.half_extent_m)?;
        require_positive("rain.spawn_height_m", self.spawn_height_m)?;
        require_positive("rain.min_fall_speed", self.min_fall_speed)?;
        require_non_negative("rain.fall_speed_jitter", self.fall_speed_jitter)?;
        require_positive("rain.drop_size_m", self.drop_size_m)?;
        require_non_negative("rain.opacity", self.opacity)?;
        if self.opacity > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "rain.opacity",
                value: self.opacity,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_range() {
        let params = RainParams {
            opacity: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_upward_speed_rejected() {
        let params = RainParams {
            min_fall_speed: -0.2,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::NotPositive {
                field: "rain.min_fall_speed",
                value: -0.2
            })
        );
    }
}
