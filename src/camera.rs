//! Orbit camera: drag to rotate around a target, wheel to zoom.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Pitch limit keeping the camera off the poles (radians, ~89°)
const MAX_PITCH_RAD: f32 = 1.553;

/// Camera orbiting a fixed target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    /// Rotation around +Y; 0 = camera on the +Z side of the target
    yaw: f32,
    /// Elevation above the XZ plane through the target
    pitch: f32,
    fov_y_rad: f32,
    aspect: f32,
    near: f32,
    far: f32,
    rotate_speed: f32,
    zoom_factor: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Create camera at `camera_position` looking at `camera_target`
    pub fn new(config: &RenderConfig) -> Self {
        let target = Vec3::from_array(config.camera_target);
        let offset = Vec3::from_array(config.camera_position) - target;
        let distance = offset.length();

        Self {
            target,
            distance: distance.clamp(config.min_distance_m, config.max_distance_m),
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance)
                .asin()
                .clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD),
            fov_y_rad: config.fov_degrees.to_radians(),
            aspect: config.aspect_ratio(),
            near: config.near_plane_m,
            far: config.far_plane_m,
            rotate_speed: config.rotate_speed_rad_per_px,
            zoom_factor: config.zoom_factor_per_line,
            min_distance: config.min_distance_m,
            max_distance: config.max_distance_m,
        }
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Rotate by a mouse drag of (dx, dy) pixels
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32) {
        self.yaw -= dx_px * self.rotate_speed;
        self.pitch = (self.pitch + dy_px * self.rotate_speed).clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
    }

    /// Zoom by wheel lines (positive = closer)
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * self.zoom_factor.powf(lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Track a new viewport size; zero-sized (minimised) windows are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space (right, up) axes of the view, for billboards
    pub fn billboard_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye_matches_config() {
        let camera = OrbitCamera::new(&RenderConfig::default());
        assert!(camera.eye().abs_diff_eq(Vec3::new(0.0, 5.0, 15.0), 1e-4));
        assert_eq!(camera.target(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let mut camera = OrbitCamera::new(&RenderConfig::default());
        let before = camera.distance();
        camera.rotate(120.0, -45.0);
        let d = (camera.eye() - camera.target()).length();
        assert!((d - before).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = OrbitCamera::new(&RenderConfig::default());
        camera.rotate(0.0, 1e6);
        let eye = camera.eye();
        // Never flips over the pole
        assert!(eye.y > 0.0);
        assert!(eye.x.abs() + eye.z.abs() > 0.0);
        assert!(camera.view_proj_matrix().is_finite());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::new(&RenderConfig::default());
        camera.zoom(1000.0);
        assert_eq!(camera.distance(), 1.0);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance(), 90.0);
    }

    #[test]
    fn test_viewport_resize() {
        let mut camera = OrbitCamera::new(&RenderConfig::default());
        camera.set_viewport(800, 800);
        assert_eq!(camera.aspect(), 1.0);

        // Minimised window keeps the last aspect
        camera.set_viewport(0, 600);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn test_billboard_axes_orthonormal() {
        let mut camera = OrbitCamera::new(&RenderConfig::default());
        camera.rotate(37.0, 12.0);
        let (right, up) = camera.billboard_axes();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
        // Right axis stays horizontal
        assert!(right.y.abs() < 1e-5);
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = OrbitCamera::new(&RenderConfig::default());
        let view_proj = camera.view_proj_matrix();

        // Matrix should not be identity or zero
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);

        // Target lands in the middle of the screen
        let clip = view_proj * Vec3::ZERO.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
