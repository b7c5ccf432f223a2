//! Circular-path parameters for the point light and the loaded prop.

use std::path::PathBuf;

use super::{require_finite, require_non_negative, require_positive};
use crate::error::ConfigError;

/// Horizontal circle traversed at constant angular speed
///
/// Position at time t: (radius * sin(t * w), height, radius * cos(t * w))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Circle radius (meters)
    pub radius_m: f32,

    /// Constant Y coordinate (meters)
    pub height_m: f32,

    /// Angular speed w (radians per second)
    /// 0.5 = one revolution every 4π ≈ 12.6 s
    pub angular_speed_rad_s: f32,
}

impl OrbitParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("orbit.radius_m", self.radius_m)?;
        require_finite("orbit.height_m", self.height_m)?;
        require_finite("orbit.angular_speed_rad_s", self.angular_speed_rad_s)?;
        Ok(())
    }

    /// Duration of one full revolution (seconds), None for a stationary orbit
    pub fn period_s(&self) -> Option<f32> {
        if self.angular_speed_rad_s == 0.0 {
            None
        } else {
            Some(std::f32::consts::TAU / self.angular_speed_rad_s.abs())
        }
    }
}

/// Orbiting point light
#[derive(Debug, Clone)]
pub struct LightParams {
    pub orbit: OrbitParams,

    /// Light colour (0xRRGGBB, sRGB)
    pub color: u32,

    /// Intensity multiplier at unit distance
    pub intensity: f32,

    /// Distance where the light contribution reaches zero (meters)
    pub range_m: f32,

    /// Unlit floor applied to the prop so it stays visible away from the light
    pub ambient: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            orbit: OrbitParams {
                radius_m: 10.0,
                height_m: 10.0,
                angular_speed_rad_s: 0.5,
            },
            color: 0xFFFFFF,
            intensity: 8.0,
            range_m: 50.0,
            ambient: 0.15,
        }
    }
}

impl LightParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbit.validate()?;
        require_non_negative("light.intensity", self.intensity)?;
        require_positive("light.range_m", self.range_m)?;
        require_non_negative("light.ambient", self.ambient)?;
        Ok(())
    }
}

/// Optional model that circles the scene once its asynchronous load completes
#[derive(Debug, Clone)]
pub struct PropParams {
    /// glTF/GLB file to load (None = no prop, permanently absent)
    pub path: Option<PathBuf>,

    /// Path around the origin; `height_m` is the fixed Y set at load time
    pub orbit: OrbitParams,

    /// Uniform model scale
    pub scale: f32,
}

impl Default for PropParams {
    fn default() -> Self {
        Self {
            path: None,
            orbit: OrbitParams {
                radius_m: 5.0,
                height_m: 1.0,
                angular_speed_rad_s: 0.5,
            },
            scale: 25.0,
        }
    }
}

impl PropParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbit.validate()?;
        require_positive("prop.scale", self.scale)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_light_period() {
        let period = LightParams::default().orbit.period_s().unwrap();
        assert!((period - 4.0 * std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_stationary_orbit_has_no_period() {
        let orbit = OrbitParams {
            radius_m: 3.0,
            height_m: 0.0,
            angular_speed_rad_s: 0.0,
        };
        assert_eq!(orbit.period_s(), None);
        assert!(orbit.validate().is_ok());
    }

    #[test]
    fn test_negative_prop_scale_rejected() {
        let params = PropParams {
            scale: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
