use crate::importer::{ImportError, ImportOptions, ImportedMesh, Importer, SceneImporter};
use crate::mesh::{Mesh, MeshError};
use std::path::{Path, PathBuf};

/// Reasons a model could not be loaded. Each maps to a distinct cause; the
/// importer's own message is carried unchanged where there is one.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to import {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: ImportError,
    },
    #[error("scene {0} is incomplete")]
    Incomplete(PathBuf),
    #[error("scene {0} has no root node")]
    NoRootNode(PathBuf),
    #[error("scene {0} contains no meshes")]
    NoMeshes(PathBuf),
    #[error("invalid geometry in {path}: {source}")]
    InvalidGeometry {
        path: PathBuf,
        #[source]
        source: MeshError,
    },
}

/// Loads the first mesh of a scene file.
#[derive(Debug, Clone)]
pub struct ModelLoader<I = SceneImporter> {
    importer: I,
    options: ImportOptions,
}

impl ModelLoader {
    /// Loader dispatching on file extension (OBJ, glTF).
    pub fn new() -> Self {
        Self::with_importer(SceneImporter::new())
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Importer> ModelLoader<I> {
    pub fn with_importer(importer: I) -> Self {
        Self {
            importer,
            options: ImportOptions::default(),
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import `path` and extract its first mesh.
    ///
    /// Additional meshes are ignored. On any failure nothing is returned,
    /// so callers never see partially extracted geometry.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Mesh, ModelLoadError> {
        let path = path.as_ref();
        let _span = tracing::info_span!("load_model", path = %path.display()).entered();

        let scene = self
            .importer
            .import(path, &self.options)
            .map_err(|source| ModelLoadError::Import {
                path: path.to_path_buf(),
                source,
            })?;

        if scene.incomplete {
            return Err(ModelLoadError::Incomplete(path.to_path_buf()));
        }
        if !scene.has_root {
            return Err(ModelLoadError::NoRootNode(path.to_path_buf()));
        }

        let mut meshes = scene.meshes.into_iter();
        let first = meshes
            .next()
            .ok_or_else(|| ModelLoadError::NoMeshes(path.to_path_buf()))?;
        let ignored = meshes.count();
        if ignored > 0 {
            tracing::debug!(ignored, "only the first mesh is used");
        }

        let (vertices, indices) = extract(first);
        let mesh = Mesh::new(vertices, indices).map_err(|source| ModelLoadError::InvalidGeometry {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "model loaded"
        );
        Ok(mesh)
    }
}

/// Flatten positions and faces, both in file order.
fn extract(mesh: ImportedMesh) -> (Vec<f32>, Vec<u32>) {
    let vertices = mesh.positions.into_iter().flatten().collect();
    let indices = mesh.faces.into_iter().flatten().collect();
    (vertices, indices)
}
