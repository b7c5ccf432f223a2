//! Time-parameterized wave displacement and surface colour ramp.
//!
//! The height function is evaluated per vertex in `shaders/ocean.wgsl`; the
//! host-side copy here states the same contract and is what tests and tooling
//! use to reason about the rendered surface.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::error::ConfigError;
use crate::params::{srgb_hex_to_linear, OceanParams};

/// Vertical displacement of a base vertex at `(x, z)` and time `t`.
///
/// `h` is the wave height scale, `f` the spatial frequency.
#[inline]
pub fn wave_height(x: f32, z: f32, t: f32, h: f32, f: f32) -> f32 {
    (x * f + t).sin() * h * 0.8 + (z * f + t * 1.5).cos() * h * 0.6
}

/// Fraction of the shallow colour at texture coordinate `v`.
#[inline]
pub fn shallow_mix(v: f32) -> f32 {
    v * 0.8 + 0.2
}

/// Uniform buffer for the ocean shader
///
/// Layout matches `OceanUniforms` in `ocean.wgsl` (colours padded to vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OceanUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub deep_color: [f32; 4],
    pub shallow_color: [f32; 4],
    pub time: f32,
    pub wave_height: f32,
    pub wave_frequency: f32,
    pub _padding: f32,
}

/// Wave parameters plus the current time uniform
#[derive(Debug, Clone)]
pub struct WaveField {
    wave_height: f32,
    wave_frequency: f32,
    deep_color: [f32; 3],
    shallow_color: [f32; 3],
    time_s: f32,
}

impl WaveField {
    pub fn new(params: &OceanParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            wave_height: params.wave_height_m,
            wave_frequency: params.wave_frequency,
            deep_color: srgb_hex_to_linear(params.deep_color),
            shallow_color: srgb_hex_to_linear(params.shallow_color),
            time_s: 0.0,
        })
    }

    /// Set the time uniform for the upcoming frame
    pub fn set_time(&mut self, time_s: f32) {
        self.time_s = time_s;
    }

    pub fn time(&self) -> f32 {
        self.time_s
    }

    pub fn wave_height(&self) -> f32 {
        self.wave_height
    }

    pub fn wave_frequency(&self) -> f32 {
        self.wave_frequency
    }

    /// Swap the amplitude scale (takes effect on the next frame)
    pub fn set_wave_height(&mut self, wave_height: f32) -> Result<(), ConfigError> {
        crate::params::require_non_negative("ocean.wave_height_m", wave_height)?;
        self.wave_height = wave_height;
        Ok(())
    }

    /// Swap the spatial frequency (takes effect on the next frame)
    pub fn set_wave_frequency(&mut self, wave_frequency: f32) -> Result<(), ConfigError> {
        crate::params::require_positive("ocean.wave_frequency", wave_frequency)?;
        self.wave_frequency = wave_frequency;
        Ok(())
    }

    /// Height offset at `(x, z)` for an arbitrary time
    pub fn height(&self, x: f32, z: f32, time_s: f32) -> f32 {
        wave_height(x, z, time_s, self.wave_height, self.wave_frequency)
    }

    /// Rendered position of a base vertex at the current time
    pub fn displaced(&self, base: [f32; 3]) -> [f32; 3] {
        let [x, y, z] = base;
        [x, y + self.height(x, z, self.time_s), z]
    }

    /// Fragment colour for texture coordinate `v` (linear RGB)
    pub fn surface_color(&self, v: f32) -> [f32; 3] {
        let a = Vec3::from_array(self.deep_color);
        let b = Vec3::from_array(self.shallow_color);
        a.lerp(b, shallow_mix(v)).to_array()
    }

    /// Pack the shader uniforms for this frame
    pub fn uniforms(&self, view_proj: Mat4) -> OceanUniforms {
        let [dr, dg, db] = self.deep_color;
        let [sr, sg, sb] = self.shallow_color;
        OceanUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            deep_color: [dr, dg, db, 1.0],
            shallow_color: [sr, sg, sb, 1.0],
            time: self.time_s,
            wave_height: self.wave_height,
            wave_frequency: self.wave_frequency,
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_pure_function_of_time() {
        let field = WaveField::new(&OceanParams::default()).unwrap();
        for i in 0..50 {
            let t = i as f32 * 0.37;
            let a = field.height(3.25, -7.5, t);
            let b = field.height(3.25, -7.5, t);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_height_at_origin() {
        // t = 0: sin(0) * h * 0.8 + cos(0) * h * 0.6 = 0.6 h
        assert_eq!(wave_height(0.0, 0.0, 0.0, 1.5, 0.5), 1.5 * 0.6);

        // Zero amplitude keeps the plane flat
        assert_eq!(wave_height(12.0, -4.0, 9.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn test_height_bounded_by_amplitude() {
        let field = WaveField::new(&OceanParams::default()).unwrap();
        let bound = 1.5 * (0.8 + 0.6) + 1e-5;
        for ix in -10..=10 {
            for iz in -10..=10 {
                let h = field.height(ix as f32 * 3.7, iz as f32 * 3.7, 42.0);
                assert!(h.abs() <= bound);
            }
        }
    }

    #[test]
    fn test_displacement_keeps_base_xz() {
        let mut field = WaveField::new(&OceanParams::default()).unwrap();
        field.set_time(2.0);
        let base = [1.0, 0.5, -3.0];
        let moved = field.displaced(base);
        assert_eq!(moved[0], base[0]);
        assert_eq!(moved[2], base[2]);
        assert_eq!(moved[1], 0.5 + field.height(1.0, -3.0, 2.0));
    }

    #[test]
    fn test_color_ramp_endpoints() {
        let params = OceanParams {
            deep_color: 0x000000,
            shallow_color: 0xFFFFFF,
            ..Default::default()
        };
        let field = WaveField::new(&params).unwrap();

        let near = field.surface_color(0.0);
        let far = field.surface_color(1.0);
        for c in near {
            assert!((c - 0.2).abs() < 1e-6);
        }
        for c in far {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_swappable_scalars() {
        let mut field = WaveField::new(&OceanParams::default()).unwrap();
        field.set_wave_height(3.0).unwrap();
        field.set_wave_frequency(0.25).unwrap();
        assert_eq!(field.height(0.0, 0.0, 0.0), 3.0 * 0.6);
        assert_eq!(field.wave_frequency(), 0.25);

        assert!(field.set_wave_frequency(0.0).is_err());
        assert!(field.set_wave_height(f32::NAN).is_err());
        // Rejected values leave the field untouched
        assert_eq!(field.wave_frequency(), 0.25);
    }

    #[test]
    fn test_uniform_packing() {
        let mut field = WaveField::new(&OceanParams::default()).unwrap();
        field.set_time(7.5);
        let u = field.uniforms(Mat4::IDENTITY);
        assert_eq!(u.time, 7.5);
        assert_eq!(u.wave_height, 1.5);
        assert_eq!(u.wave_frequency, 0.5);
        assert_eq!(u.deep_color[3], 1.0);
        assert_eq!(std::mem::size_of::<OceanUniforms>(), 112);
    }
}
