//! Per-frame composition root.
//!
//! Each tick samples the clock once and passes that time by value to every
//! animated component, in a fixed order, before handing the scene to the
//! renderer.

use glam::Vec3;
use rand::Rng;

use crate::clock::Clock;
use crate::error::ConfigError;
use crate::light::OrbitLight;
use crate::ocean::{OceanGrid, WaveField};
use crate::params::SceneConfig;
use crate::prop::{Prop, PropAnimator, PropStatus};
use crate::rain::ParticleRain;

/// Everything animated by the driver
pub struct Scene {
    pub grid: OceanGrid,
    pub waves: WaveField,
    pub rain: ParticleRain,
    pub light: OrbitLight,
    pub prop: PropAnimator,
}

impl Scene {
    /// Build all components from a validated configuration
    ///
    /// The prop loader (if a path is configured) starts here and runs in the
    /// background.
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: OceanGrid::new(&config.ocean)?,
            waves: WaveField::new(&config.ocean)?,
            rain: ParticleRain::new(&config.rain, rng)?,
            light: OrbitLight::new(&config.light)?,
            prop: PropAnimator::from_params(&config.prop)?,
        })
    }
}

/// Read-only snapshot handed to the renderer once per frame
pub struct FrameView<'a> {
    pub time_s: f32,
    pub grid: &'a OceanGrid,
    pub waves: &'a WaveField,
    pub rain: &'a ParticleRain,
    /// Rain positions changed and must be re-uploaded before drawing
    pub rain_dirty: bool,
    pub light: &'a OrbitLight,
    pub light_position: Vec3,
    pub prop: Option<&'a Prop>,
}

/// External renderer that draws one frame
pub trait SceneRenderer {
    type Error;

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error>;
}

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, no frame run yet
    Idle,
    /// Looping; `frames` completed so far
    Running { frames: u64 },
}

/// Runs the per-frame update sequence
pub struct FrameDriver<C: Clock> {
    clock: C,
    scene: Scene,
    state: DriverState,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C, scene: Scene) -> Self {
        Self {
            clock,
            scene,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Run one frame and return the sampled time
    ///
    /// Order: sample t, wave time uniform, rain step, light, prop, draw. A
    /// renderer error is returned after all updates have been applied; the
    /// driver stays Running and the next tick proceeds normally.
    pub fn tick<R: SceneRenderer>(&mut self, renderer: &mut R) -> Result<f32, R::Error> {
        if self.state == DriverState::Idle {
            log::debug!("Frame driver running");
            self.state = DriverState::Running { frames: 0 };
        }

        let time_s = self.clock.elapsed_s();

        let scene = &mut self.scene;
        scene.waves.set_time(time_s);
        scene.rain.update();
        let light_position = scene.light.update(time_s);
        if scene.prop.poll() == PropStatus::Present {
            scene.prop.update(time_s);
        }

        let rain_dirty = scene.rain.take_dirty();
        let view = FrameView {
            time_s,
            grid: &scene.grid,
            waves: &scene.waves,
            rain: &scene.rain,
            rain_dirty,
            light: &scene.light,
            light_position,
            prop: scene.prop.prop(),
        };
        let drawn = renderer.draw(&view);

        if let DriverState::Running { frames } = &mut self.state {
            *frames += 1;
        }

        drawn.map(|()| time_s)
    }
}
