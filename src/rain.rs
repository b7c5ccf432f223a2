//! Falling rain: a fixed pool of drops that wrap from the ground back to the
//! spawn ceiling.
//!
//! Each drop keeps its horizontal position and fall speed for its entire
//! lifetime; only its height cycles. The horizontal density pattern drawn at
//! construction is therefore static for the whole run.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::Rng;

use crate::error::ConfigError;
use crate::params::{srgb_hex_to_linear, RainParams};

/// One drop as seen from outside the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Signed per-frame step, always < 0
    pub speed: f32,
}

/// Uniform buffer for the rain shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RainUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Camera right axis (xyz) for billboarding
    pub camera_right: [f32; 4],
    /// Camera up axis (xyz) for billboarding
    pub camera_up: [f32; 4],
    /// Linear RGB + opacity
    pub color: [f32; 4],
    pub size: f32,
    pub _padding: [f32; 3],
}

/// Fixed-capacity rain field
pub struct ParticleRain {
    /// Contiguous [x, y, z] per drop, uploaded as per-instance data
    positions: Vec<[f32; 3]>,
    speeds: Vec<f32>,
    spawn_height: f32,
    color: [f32; 4],
    drop_size: f32,
    dirty: bool,
}

impl ParticleRain {
    /// Draw a new field from `rng`
    ///
    /// x, z are uniform in [-half_extent, half_extent), y in [0, spawn_height),
    /// speed is -(min_fall_speed + uniform[0, fall_speed_jitter)).
    pub fn new<R: Rng + ?Sized>(params: &RainParams, rng: &mut R) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut positions = Vec::with_capacity(params.count);
        let mut speeds = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            let x = (rng.gen::<f32>() - 0.5) * 2.0 * params.half_extent_m;
            let y = rng.gen::<f32>() * params.spawn_height_m;
            let z = (rng.gen::<f32>() - 0.5) * 2.0 * params.half_extent_m;
            positions.push([x, y, z]);
            speeds.push(-params.min_fall_speed - rng.gen::<f32>() * params.fall_speed_jitter);
        }

        Ok(Self::assemble(params, positions, speeds))
    }

    /// Build a field from explicit drops
    ///
    /// The pool size is the number of drops given; `params.count` is ignored.
    pub fn from_particles(
        params: &RainParams,
        particles: impl IntoIterator<Item = Particle>,
    ) -> Result<Self, ConfigError> {
        let (positions, speeds): (Vec<_>, Vec<_>) = particles
            .into_iter()
            .map(|p| ([p.x, p.y, p.z], p.speed))
            .unzip();

        let params = RainParams {
            count: positions.len(),
            ..params.clone()
        };
        params.validate()?;

        for (index, (pos, speed)) in positions.iter().zip(&speeds).enumerate() {
            let [x, y, z] = *pos;
            if !(x.is_finite() && y.is_finite() && z.is_finite() && speed.is_finite()) {
                return Err(ConfigError::InvalidParticle {
                    index,
                    reason: "non-finite component",
                });
            }
            if *speed >= 0.0 {
                return Err(ConfigError::InvalidParticle {
                    index,
                    reason: "speed must be negative",
                });
            }
            if !(0.0..=params.spawn_height_m).contains(&y) {
                return Err(ConfigError::InvalidParticle {
                    index,
                    reason: "height outside [0, spawn height]",
                });
            }
            if x.abs() > params.half_extent_m || z.abs() > params.half_extent_m {
                return Err(ConfigError::InvalidParticle {
                    index,
                    reason: "horizontal position outside the field",
                });
            }
        }

        Ok(Self::assemble(&params, positions, speeds))
    }

    fn assemble(params: &RainParams, positions: Vec<[f32; 3]>, speeds: Vec<f32>) -> Self {
        let [r, g, b] = srgb_hex_to_linear(params.color);
        Self {
            positions,
            speeds,
            spawn_height: params.spawn_height_m,
            color: [r, g, b, params.opacity],
            drop_size: params.drop_size_m,
            dirty: true,
        }
    }

    /// Advance every drop by one frame
    ///
    /// A drop that ends below y = 0 is recycled to the spawn ceiling with its
    /// x, z and speed unchanged.
    pub fn update(&mut self) {
        let spawn_height = self.spawn_height;
        for (pos, &speed) in self.positions.iter_mut().zip(&self.speeds) {
            pos[1] += speed;
            if pos[1] < 0.0 {
                pos[1] = spawn_height;
            }
        }
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        let [x, y, z] = *self.positions.get(index)?;
        Some(Particle {
            x,
            y,
            z,
            speed: self.speeds[index],
        })
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.speeds)
            .map(|(&[x, y, z], &speed)| Particle { x, y, z, speed })
    }

    /// Instance buffer contents
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn spawn_height(&self) -> f32 {
        self.spawn_height
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return whether the positions changed since the last call, clearing the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Pack the shader uniforms for this frame
    pub fn uniforms(&self, view_proj: Mat4, camera_right: Vec3, camera_up: Vec3) -> RainUniforms {
        RainUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_right: camera_right.extend(0.0).to_array(),
            camera_up: camera_up.extend(0.0).to_array(),
            color: self.color,
            size: self.drop_size,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn droplet(y: f32, speed: f32) -> Particle {
        Particle {
            x: 0.0,
            y,
            z: 0.0,
            speed,
        }
    }

    #[test]
    fn test_generated_field_respects_bounds() {
        let params = RainParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rain = ParticleRain::new(&params, &mut rng).unwrap();

        assert_eq!(rain.len(), 10_000);
        for p in rain.particles() {
            assert!((-50.0..=50.0).contains(&p.x));
            assert!((-50.0..=50.0).contains(&p.z));
            assert!((0.0..=50.0).contains(&p.y));
            assert!(p.speed < 0.0);
            assert!(-p.speed >= 0.2 && -p.speed < 0.7 + 1e-6);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let params = RainParams {
            count: 64,
            ..Default::default()
        };
        let a = ParticleRain::new(&params, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = ParticleRain::new(&params, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(a.particles().eq(b.particles()));
    }

    #[test]
    fn test_wrap_to_exact_ceiling() {
        let params = RainParams::default();
        let mut rain = ParticleRain::from_particles(&params, [droplet(5.0, -1.0)]).unwrap();

        for _ in 0..5 {
            rain.update();
        }
        assert_eq!(rain.particle(0).unwrap().y, 0.0);

        // Sixth step would reach -1; the drop recycles instead
        rain.update();
        assert_eq!(rain.particle(0).unwrap().y, 50.0);
    }

    #[test]
    fn test_heights_stay_in_range() {
        let params = RainParams {
            count: 500,
            ..Default::default()
        };
        let mut rain = ParticleRain::new(&params, &mut StdRng::seed_from_u64(11)).unwrap();
        for _ in 0..400 {
            rain.update();
            for p in rain.particles() {
                assert!(p.y >= 0.0 && p.y <= 50.0, "height {} out of range", p.y);
            }
        }
    }

    #[test]
    fn test_identity_stable_across_updates() {
        let params = RainParams {
            count: 200,
            ..Default::default()
        };
        let mut rain = ParticleRain::new(&params, &mut StdRng::seed_from_u64(5)).unwrap();
        let before: Vec<_> = rain.particles().collect();

        for _ in 0..1000 {
            rain.update();
        }

        for (a, b) in before.iter().zip(rain.particles()) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
            assert_eq!(a.speed.to_bits(), b.speed.to_bits());
        }
    }

    #[test]
    fn test_three_drop_scenario() {
        let params = RainParams::default();
        let mut rain = ParticleRain::from_particles(
            &params,
            [droplet(10.0, -1.0), droplet(0.5, -0.3), droplet(49.0, -0.6)],
        )
        .unwrap();

        rain.update();
        let ys: Vec<f32> = rain.particles().map(|p| p.y).collect();
        assert_eq!(ys[0], 9.0);
        assert!((ys[1] - 0.2).abs() < 1e-6);
        assert!((ys[2] - 48.4).abs() < 1e-4);

        // Nine more steps bring the first drop to 0, the tenth wraps it
        for _ in 0..9 {
            rain.update();
        }
        assert_eq!(rain.particle(0).unwrap().y, 0.0);
        rain.update();
        assert_eq!(rain.particle(0).unwrap().y, 50.0);
    }

    #[test]
    fn test_dirty_flag() {
        let params = RainParams::default();
        let mut rain = ParticleRain::from_particles(&params, [droplet(1.0, -0.5)]).unwrap();

        // Freshly built buffers need an initial upload
        assert!(rain.take_dirty());
        assert!(!rain.take_dirty());

        rain.update();
        assert!(rain.is_dirty());
        assert!(rain.take_dirty());
        assert!(!rain.is_dirty());
    }

    #[test]
    fn test_invalid_particles_rejected() {
        let params = RainParams::default();

        let upward = ParticleRain::from_particles(&params, [droplet(1.0, 0.5)]);
        assert!(matches!(
            upward,
            Err(ConfigError::InvalidParticle { index: 0, .. })
        ));

        let too_high = ParticleRain::from_particles(&params, [droplet(1.0, -0.5), droplet(60.0, -0.5)]);
        assert!(matches!(
            too_high,
            Err(ConfigError::InvalidParticle { index: 1, .. })
        ));

        let empty = ParticleRain::from_particles(&params, Vec::<Particle>::new());
        assert_eq!(
            empty.err(),
            Some(ConfigError::Empty {
                field: "rain.count"
            })
        );
    }

    #[test]
    fn test_uniform_packing() {
        let rain = ParticleRain::from_particles(&RainParams::default(), [droplet(1.0, -0.5)]).unwrap();
        let u = rain.uniforms(Mat4::IDENTITY, Vec3::X, Vec3::Y);
        assert_eq!(u.color, [1.0, 0.0, 0.0, 0.8]);
        assert_eq!(u.size, 0.2);
        assert_eq!(u.camera_right, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(std::mem::size_of::<RainUniforms>(), 128);
    }
}
