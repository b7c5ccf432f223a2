//! Background glTF loading with a one-shot handoff to the frame loop.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use glam::{Mat3, Mat4, Vec3};

use super::mesh::PropMesh;
use crate::error::AssetLoadError;

/// Receiving end of the loader: yields exactly one result, then disconnects
pub type PropHandoff = mpsc::Receiver<Result<PropMesh, AssetLoadError>>;

/// Start loading `path` on a background thread
///
/// The returned handoff is polled once per frame by the prop animator. If the
/// thread cannot be spawned the sender is dropped and the animator observes a
/// vanished loader.
pub fn spawn_loader(path: PathBuf) -> PropHandoff {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("prop-loader".to_string())
        .spawn(move || {
            log::debug!("Loading prop model from {}", path.display());
            // Receiver is gone only if the app already exited
            let _ = tx.send(load_gltf(&path));
        });

    if let Err(e) = spawned {
        log::error!("Failed to spawn prop loader thread: {}", e);
    }

    rx
}

/// Load every triangle primitive reachable from the default scene
///
/// Node transforms are baked into the vertices. Each primitive keeps the base
/// colour factor of its material.
pub fn load_gltf(path: &Path) -> Result<PropMesh, AssetLoadError> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|source| AssetLoadError::Gltf {
            path: path.to_path_buf(),
            source,
        })?;

    let mut mesh = PropMesh::default();

    match document
        .default_scene()
        .or_else(|| document.scenes().next())
    {
        Some(scene) => {
            for node in scene.nodes() {
                append_node(&node, Mat4::IDENTITY, &buffers, &mut mesh);
            }
        }
        // Scene-less files: take meshes as authored
        None => {
            for gltf_mesh in document.meshes() {
                for primitive in gltf_mesh.primitives() {
                    append_primitive(&primitive, Mat4::IDENTITY, &buffers, &mut mesh);
                }
            }
        }
    }

    if mesh.is_empty() {
        return Err(AssetLoadError::NoGeometry {
            path: path.to_path_buf(),
        });
    }

    Ok(mesh)
}

fn append_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut PropMesh,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(gltf_mesh) = node.mesh() {
        for primitive in gltf_mesh.primitives() {
            append_primitive(&primitive, world, buffers, out);
        }
    }

    for child in node.children() {
        append_node(&child, world, buffers, out);
    }
}

fn append_primitive(
    primitive: &gltf::Primitive<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut PropMesh,
) {
    if !matches!(primitive.mode(), gltf::mesh::Mode::Triangles) {
        log::debug!("Skipping non-triangle primitive {}", primitive.index());
        return;
    }

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let Some(positions) = reader.read_positions() else {
        return;
    };
    let positions: Vec<Vec3> = positions
        .map(|p| world.transform_point3(Vec3::from_array(p)))
        .collect();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.iter().any(|&i| i as usize >= positions.len()) {
        log::warn!(
            "Skipping primitive {} with out-of-range indices",
            primitive.index()
        );
        return;
    }

    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let normals: Option<Vec<Vec3>> = reader.read_normals().map(|normals| {
        normals
            .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
            .collect()
    });

    let [r, g, b, _] = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    out.append(&positions, normals.as_deref(), &indices, [r, g, b]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Write a one-triangle glTF (+ .bin) into a fresh temp directory
    fn write_triangle_gltf(name: &str, with_mesh: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stormglass-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();

        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let bytes: &[u8] = bytemuck::cast_slice(&positions[..]);
        fs::write(dir.join("tri.bin"), bytes).unwrap();

        let nodes = if with_mesh {
            r#"[{"mesh": 0, "translation": [0.0, 2.0, 0.0]}]"#
        } else {
            r#"[{"translation": [0.0, 2.0, 0.0]}]"#
        };
        let json = format!(
            r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": {nodes},
  "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}}}]}}],
  "buffers": [{{"uri": "tri.bin", "byteLength": 36}}],
  "bufferViews": [{{"buffer": 0, "byteOffset": 0, "byteLength": 36}}],
  "accessors": [{{
    "bufferView": 0,
    "componentType": 5126,
    "count": 3,
    "type": "VEC3",
    "min": [0.0, 0.0, 0.0],
    "max": [1.0, 1.0, 0.0]
  }}]
}}"#
        );
        let path = dir.join("tri.gltf");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_triangle_with_node_transform() {
        let path = write_triangle_gltf("triangle", true);
        let mesh = load_gltf(&path).unwrap();

        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);

        // Node translation is baked in
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(hi, Vec3::new(1.0, 3.0, 0.0));

        // No normals in the file: generated from CCW winding
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            // Default material is white
            assert_eq!(v.color, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_scene_without_meshes_is_no_geometry() {
        let path = write_triangle_gltf("empty", false);
        assert!(matches!(
            load_gltf(&path),
            Err(AssetLoadError::NoGeometry { .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_gltf_error() {
        let path = std::env::temp_dir().join("stormglass-definitely-missing.glb");
        assert!(matches!(
            load_gltf(&path),
            Err(AssetLoadError::Gltf { .. })
        ));
    }

    #[test]
    fn test_spawned_loader_delivers_once() {
        let path = std::env::temp_dir().join("stormglass-missing-again.glb");
        let handoff = spawn_loader(path);

        let first = handoff.recv().unwrap();
        assert!(first.is_err());

        // Single delivery: the sender is gone afterwards
        assert!(handoff.recv().is_err());
    }
}
