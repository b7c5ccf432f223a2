//! Point light circling the scene on a horizontal orbit.

use glam::Vec3;

use crate::error::ConfigError;
use crate::params::{srgb_hex_to_linear, LightParams, OrbitParams};

/// Position on a horizontal circle at time `t`
#[inline]
pub fn orbit_position(orbit: &OrbitParams, time_s: f32) -> Vec3 {
    let angle = time_s * orbit.angular_speed_rad_s;
    Vec3::new(
        orbit.radius_m * angle.sin(),
        orbit.height_m,
        orbit.radius_m * angle.cos(),
    )
}

/// Orbiting point light
#[derive(Debug, Clone)]
pub struct OrbitLight {
    orbit: OrbitParams,
    color: [f32; 3],
    intensity: f32,
    range_m: f32,
    ambient: f32,
    position: Vec3,
}

impl OrbitLight {
    pub fn new(params: &LightParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            orbit: params.orbit,
            color: srgb_hex_to_linear(params.color),
            intensity: params.intensity,
            range_m: params.range_m,
            ambient: params.ambient,
            position: orbit_position(&params.orbit, 0.0),
        })
    }

    /// Position at an arbitrary time (does not touch the cached position)
    pub fn position_at(&self, time_s: f32) -> Vec3 {
        orbit_position(&self.orbit, time_s)
    }

    /// Move the light to its position at `time_s`
    pub fn update(&mut self, time_s: f32) -> Vec3 {
        self.position = self.position_at(time_s);
        self.position
    }

    /// Position from the most recent update
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn range(&self) -> f32 {
        self.range_m
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn light() -> OrbitLight {
        OrbitLight::new(&LightParams::default()).unwrap()
    }

    #[test]
    fn test_position_at_t0() {
        // sin(0) = 0, cos(0) = 1
        assert_eq!(light().position_at(0.0), Vec3::new(0.0, 10.0, 10.0));
    }

    #[test]
    fn test_orbit_periodicity() {
        let light = light();
        let period = 2.0 * PI / 0.5;
        for i in 0..20 {
            let t = i as f32 * 0.61;
            let a = light.position_at(t);
            let b = light.position_at(t + period);
            assert!(a.abs_diff_eq(b, 1e-4), "{:?} != {:?} at t={}", a, b, t);
        }
    }

    #[test]
    fn test_constant_height_and_radius() {
        let light = light();
        for i in 0..100 {
            let p = light.position_at(i as f32 * 0.173);
            assert_eq!(p.y, 10.0);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_update_caches_position() {
        let mut light = light();
        let t = PI; // quarter turn at 0.5 rad/s
        let p = light.update(t);
        assert_eq!(light.position(), p);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 10.0, 0.0), 1e-4));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let params = LightParams {
            range_m: 0.0,
            ..Default::default()
        };
        assert!(OrbitLight::new(&params).is_err());
    }
}
