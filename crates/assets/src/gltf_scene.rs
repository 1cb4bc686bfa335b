use crate::importer::{ImportError, ImportOptions, ImportedMesh, ImportedScene, Importer};
use gltf::mesh::Mode;
use std::path::Path;

/// glTF 2.0 importer (`.gltf` with external or embedded buffers, `.glb`).
///
/// Each glTF mesh becomes one imported mesh with its primitives merged.
/// Strips and fans are triangulated; point and line primitives are skipped.
/// A primitive without positions marks the scene incomplete, and a document
/// without any scene has no root node.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfImporter;

impl Importer for GltfImporter {
    fn import(&self, path: &Path, options: &ImportOptions) -> Result<ImportedScene, ImportError> {
        let (document, buffers, _images) = gltf::import(path)?;

        let has_root = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .is_some();

        let mut incomplete = false;
        let mut meshes = Vec::new();

        for mesh in document.meshes() {
            let mut imported = ImportedMesh {
                name: mesh.name().unwrap_or("unnamed").to_string(),
                ..Default::default()
            };

            for primitive in mesh.primitives() {
                let mode = primitive.mode();
                let triangulated = matches!(mode, Mode::TriangleStrip | Mode::TriangleFan);
                if !matches!(mode, Mode::Triangles) && !(triangulated && options.triangulate) {
                    tracing::debug!(?mode, mesh = mesh.index(), "skipping primitive");
                    continue;
                }

                let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));
                let Some(positions) = reader.read_positions() else {
                    incomplete = true;
                    continue;
                };

                let base = imported.positions.len() as u32;
                imported.positions.extend(positions);
                let count = imported.positions.len() as u32 - base;

                let indices: Vec<u32> = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect(),
                    None => (0..count).collect(),
                };

                let faces = match mode {
                    Mode::TriangleStrip => strip_to_triangles(&indices),
                    Mode::TriangleFan => fan_to_triangles(&indices),
                    _ => list_to_triangles(&indices),
                };
                imported
                    .faces
                    .extend(faces.into_iter().map(|[a, b, c]| [a + base, b + base, c + base]));
            }

            meshes.push(imported);
        }

        Ok(ImportedScene {
            incomplete,
            has_root,
            meshes,
        })
    }
}

fn list_to_triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect()
}

/// Alternate winding on odd triangles so every face keeps the strip's
/// orientation.
fn strip_to_triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .windows(3)
        .enumerate()
        .map(|(i, w)| {
            if i % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            }
        })
        .collect()
}

fn fan_to_triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    match indices.split_first() {
        Some((&hub, rest)) => rest.windows(2).map(|w| [hub, w[0], w[1]]).collect(),
        None => Vec::new(),
    }
}
