//! Flattened prop geometry ready for upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex data for the prop mesh (position + normal + base colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PropVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// All triangles of a model merged into one indexed list, in model space
#[derive(Debug, Clone, Default)]
pub struct PropMesh {
    vertices: Vec<PropVertex>,
    indices: Vec<u32>,
}

impl PropMesh {
    pub fn vertices(&self) -> &[PropVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append one primitive; `indices` are relative to `positions`
    ///
    /// Missing normals (`None`) are generated by averaging face normals.
    pub fn append(
        &mut self,
        positions: &[Vec3],
        normals: Option<&[Vec3]>,
        indices: &[u32],
        color: [f32; 3],
    ) {
        let generated;
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => {
                generated = smooth_normals(positions, indices);
                generated.as_slice()
            }
        };

        let base = self.vertices.len() as u32;
        self.vertices
            .extend(positions.iter().zip(normals).map(|(p, n)| PropVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color,
            }));
        self.indices.extend(indices.iter().map(|i| base + i));
    }

    /// Axis-aligned bounds (min, max) in model space
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Bounding-box edge lengths in model space
    pub fn size(&self) -> Vec3 {
        self.bounds().map_or(Vec3::ZERO, |(lo, hi)| hi - lo)
    }
}

/// Per-vertex normals from area-weighted face normals
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    for n in &mut normals {
        let unit = n.normalize_or_zero();
        *n = if unit == Vec3::ZERO { Vec3::Y } else { unit };
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::X, Vec3::Y]
    }

    #[test]
    fn test_generated_normals_follow_winding() {
        let normals = smooth_normals(&triangle(), &[0, 1, 2]);
        assert_eq!(normals, vec![Vec3::Z; 3]);

        let flipped = smooth_normals(&triangle(), &[0, 2, 1]);
        assert_eq!(flipped, vec![Vec3::NEG_Z; 3]);
    }

    #[test]
    fn test_unreferenced_vertex_gets_up_normal() {
        let mut positions = triangle();
        positions.push(Vec3::ONE);
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], Vec3::Y);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut mesh = PropMesh::default();
        mesh.append(&triangle(), None, &[0, 1, 2], [1.0, 0.0, 0.0]);
        mesh.append(&triangle(), None, &[0, 1, 2], [0.0, 1.0, 0.0]);

        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices()[4].color, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bounds_and_size() {
        let mut mesh = PropMesh::default();
        assert_eq!(mesh.bounds(), None);
        assert_eq!(mesh.size(), Vec3::ZERO);

        let positions = [Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 2.0), Vec3::ZERO];
        mesh.append(&positions, None, &[0, 1, 2], [1.0; 3]);
        assert_eq!(
            mesh.bounds(),
            Some((Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 2.0)))
        );
        assert_eq!(mesh.size(), Vec3::new(4.0, 4.0, 2.0));
    }
}
