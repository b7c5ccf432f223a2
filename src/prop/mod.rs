//! Optional prop model that circles the scene once its load completes.
//!
//! The prop may never arrive: a failed or missing load leaves it absent for
//! the rest of the run, and every per-frame update is then a no-op.

mod loader;
mod mesh;

use std::sync::mpsc::TryRecvError;

use glam::{Mat4, Quat, Vec3};

pub use loader::{load_gltf, spawn_loader, PropHandoff};
pub use mesh::{smooth_normals, PropMesh, PropVertex};

use crate::error::{AssetLoadError, ConfigError};
use crate::light::orbit_position;
use crate::params::{OrbitParams, PropParams};

/// Loaded prop entity
#[derive(Debug, Clone)]
pub struct Prop {
    mesh: PropMesh,
    position: Vec3,
    scale: f32,
}

impl Prop {
    pub fn mesh(&self) -> &PropMesh {
        &self.mesh
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Model-to-world transform (uniform scale, then translation)
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.position)
    }
}

/// Where the prop is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropStatus {
    /// Load in flight
    Pending,
    /// Entity available and animated every frame
    Present,
    /// No prop configured, or the load failed (permanent)
    Absent,
}

enum PropState {
    Pending(PropHandoff),
    Present(Prop),
    Absent,
}

/// Drives the prop along its circular path when it exists
pub struct PropAnimator {
    orbit: OrbitParams,
    scale: f32,
    state: PropState,
}

impl PropAnimator {
    /// Animator with no prop; stays absent forever
    pub fn absent(params: &PropParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            orbit: params.orbit,
            scale: params.scale,
            state: PropState::Absent,
        })
    }

    /// Animator waiting on a loader handoff
    pub fn pending(params: &PropParams, handoff: PropHandoff) -> Result<Self, ConfigError> {
        let mut animator = Self::absent(params)?;
        animator.state = PropState::Pending(handoff);
        Ok(animator)
    }

    /// Start loading `params.path` in the background, or stay absent without one
    pub fn from_params(params: &PropParams) -> Result<Self, ConfigError> {
        match &params.path {
            Some(path) => Self::pending(params, spawn_loader(path.clone())),
            None => Self::absent(params),
        }
    }

    /// Check the loader handoff without blocking
    ///
    /// A delivered mesh becomes the prop with its fixed height set here. A
    /// failure is logged once and leaves the prop permanently absent.
    pub fn poll(&mut self) -> PropStatus {
        if let PropState::Pending(handoff) = &self.state {
            let outcome = match handoff.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return PropStatus::Pending,
                Err(TryRecvError::Disconnected) => Err(AssetLoadError::LoaderVanished),
            };

            self.state = match outcome {
                Ok(mesh) => {
                    let size = mesh.size() * self.scale;
                    log::info!(
                        "Prop loaded: {} vertices, {} triangles, size {:.2} x {:.2} x {:.2}",
                        mesh.vertices().len(),
                        mesh.indices().len() / 3,
                        size.x,
                        size.y,
                        size.z
                    );
                    PropState::Present(Prop {
                        mesh,
                        position: Vec3::new(0.0, self.orbit.height_m, 0.0),
                        scale: self.scale,
                    })
                }
                Err(e) => {
                    log::error!("Failed to load prop model: {}", e);
                    PropState::Absent
                }
            };
        }
        self.status()
    }

    /// Move the prop along its path; no-op while absent or pending
    ///
    /// Only x and z change. y keeps the value set at load time.
    pub fn update(&mut self, time_s: f32) {
        if let PropState::Present(prop) = &mut self.state {
            let target = orbit_position(&self.orbit, time_s);
            prop.position.x = target.x;
            prop.position.z = target.z;
        }
    }

    pub fn status(&self) -> PropStatus {
        match self.state {
            PropState::Pending(_) => PropStatus::Pending,
            PropState::Present(_) => PropStatus::Present,
            PropState::Absent => PropStatus::Absent,
        }
    }

    pub fn prop(&self) -> Option<&Prop> {
        match &self.state {
            PropState::Present(prop) => Some(prop),
            _ => None,
        }
    }
}
