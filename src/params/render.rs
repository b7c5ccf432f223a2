//! Rendering, camera, sky and recording configuration.

use super::{require_finite, require_positive};
use crate::error::ConfigError;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,

    /// Initial camera position (meters)
    pub camera_position: [f32; 3],

    /// Point the camera orbits around (meters)
    pub camera_target: [f32; 3],

    /// Orbit rotation per dragged pixel (radians)
    pub rotate_speed_rad_per_px: f32,

    /// Distance multiplier per wheel line (< 1 zooms in on positive scroll)
    pub zoom_factor_per_line: f32,

    /// Closest and farthest orbit distance (meters)
    pub min_distance_m: f32,
    pub max_distance_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
            camera_position: [0.0, 5.0, 15.0],
            camera_target: [0.0, 0.0, 0.0],
            rotate_speed_rad_per_px: 0.005,
            zoom_factor_per_line: 0.95,
            min_distance_m: 1.0,
            max_distance_m: 90.0, // Stays inside the sky sphere
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Empty {
                field: "render.window_size",
            });
        }
        require_positive("render.fov_degrees", self.fov_degrees)?;
        if self.fov_degrees >= 180.0 {
            return Err(ConfigError::OutOfRange {
                field: "render.fov_degrees",
                value: self.fov_degrees,
                min: 0.0,
                max: 180.0,
            });
        }
        require_positive("render.near_plane_m", self.near_plane_m)?;
        require_positive("render.far_plane_m", self.far_plane_m)?;
        if self.near_plane_m >= self.far_plane_m {
            return Err(ConfigError::Misordered {
                low: "render.near_plane_m",
                high: "render.far_plane_m",
            });
        }
        for v in self.camera_position.iter().chain(&self.camera_target) {
            require_finite("render.camera", *v)?;
        }
        if self.camera_position == self.camera_target {
            return Err(ConfigError::Misordered {
                low: "render.camera_target",
                high: "render.camera_position",
            });
        }
        require_positive("render.rotate_speed_rad_per_px", self.rotate_speed_rad_per_px)?;
        require_positive("render.zoom_factor_per_line", self.zoom_factor_per_line)?;
        require_positive("render.min_distance_m", self.min_distance_m)?;
        require_positive("render.max_distance_m", self.max_distance_m)?;
        if self.min_distance_m > self.max_distance_m {
            return Err(ConfigError::Misordered {
                low: "render.min_distance_m",
                high: "render.max_distance_m",
            });
        }
        Ok(())
    }
}

/// Gradient sky sphere
#[derive(Debug, Clone)]
pub struct SkyParams {
    /// Sphere radius around the origin (meters)
    pub radius_m: f32,

    /// Colour at the zenith (0xRRGGBB, sRGB)
    pub top_color: u32,

    /// Colour at and below the horizon (0xRRGGBB, sRGB)
    pub bottom_color: u32,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            radius_m: 100.0,
            top_color: 0xFF5733,    // Ketchup red
            bottom_color: 0xFFD700, // Mustard yellow
        }
    }
}

impl SkyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("sky.radius_m", self.radius_m)
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("recording.duration_secs", self.duration_secs)?;
        if self.fps == 0 {
            return Err(ConfigError::Empty {
                field: "recording.fps",
            });
        }
        Ok(())
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Path of a single captured frame
    pub fn frame_path(&self, frame_num: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), frame_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aspect() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_planes_must_be_ordered() {
        let config = RenderConfig {
            near_plane_m: 10.0,
            far_plane_m: 1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Misordered {
                low: "render.near_plane_m",
                high: "render.far_plane_m"
            })
        );
    }

    #[test]
    fn test_recording_frame_count_and_paths() {
        let config = RecordingConfig::new(2.5);
        assert_eq!(config.total_frames(), 150);
        assert_eq!(config.frames_dir(), "recording/frames");
        assert_eq!(config.frame_path(7), "recording/frames/frame_00007.png");
    }
}
