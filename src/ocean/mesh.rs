//! Ocean grid mesh: a flat XZ plane whose base positions never change.

use bytemuck::{Pod, Zeroable};

use crate::error::ConfigError;
use crate::params::OceanParams;

/// Vertex data for ocean mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Ocean grid mesh
///
/// Vertices hold rest positions only. Wave displacement is applied per frame
/// in the vertex stage and is never written back here.
pub struct OceanGrid {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    segments: usize,
}

impl OceanGrid {
    /// Create a new ocean grid with specified parameters
    pub fn new(params: &OceanParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let segments = params.segments;
        let step = params.size_m / segments as f32;
        let half_size = params.size_m / 2.0;

        let mut vertices = Vec::with_capacity((segments + 1) * (segments + 1));
        let mut indices = Vec::with_capacity(segments * segments * 6);

        // Generate flat XZ plane grid, far edge (z = -half) first so that
        // v runs from 1 at the horizon side to 0 at the viewer side
        for z in 0..=segments {
            for x in 0..=segments {
                let x_pos = x as f32 * step - half_size;
                let z_pos = z as f32 * step - half_size;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    uv: [
                        x as f32 / segments as f32,
                        1.0 - z as f32 / segments as f32,
                    ],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from +Y)
        for z in 0..segments {
            for x in 0..segments {
                let top_left = (z * (segments + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (segments + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Ok(Self {
            vertices,
            indices,
            segments,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices per side
    pub fn resolution(&self) -> usize {
        self.segments + 1
    }
}
