//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use stormglass::params::{RecordingConfig, SceneConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stormglass")]
#[command(about = "Animated ocean vignette with rain and an orbiting light", long_about = None)]
pub struct Args {
    /// Record frames to recording/frames (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// glTF/GLB model to circle the scene
    #[arg(long, value_name = "PATH")]
    pub prop: Option<PathBuf>,

    /// Uniform scale applied to the prop model
    #[arg(long, value_name = "FACTOR")]
    pub prop_scale: Option<f32>,

    /// Number of rain drops
    #[arg(long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Wave height scale (meters)
    #[arg(long, value_name = "METERS")]
    pub wave_height: Option<f32>,

    /// Spatial wave frequency (radians per meter)
    #[arg(long, value_name = "RAD_PER_M")]
    pub wave_frequency: Option<f32>,

    /// Point light intensity
    #[arg(long, value_name = "INTENSITY")]
    pub light_intensity: Option<f32>,

    /// Seed for the rain layout (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

impl Args {
    /// Scene configuration with unset flags left at their defaults
    pub fn scene_config(&self) -> SceneConfig {
        let mut config = SceneConfig::default();

        if let Some(path) = &self.prop {
            config.prop.path = Some(path.clone());
        }
        if let Some(scale) = self.prop_scale {
            config.prop.scale = scale;
        }
        if let Some(count) = self.particles {
            config.rain.count = count;
        }
        if let Some(height) = self.wave_height {
            config.ocean.wave_height_m = height;
        }
        if let Some(frequency) = self.wave_frequency {
            config.ocean.wave_frequency = frequency;
        }
        if let Some(intensity) = self.light_intensity {
            config.light.intensity = intensity;
        }
        config.recording = self.record.map(RecordingConfig::new);
        config.seed = self.seed;

        config
    }
}
