use crate::gltf_scene::GltfImporter;
use crate::obj::ObjImporter;
use std::path::Path;

/// Post-processing requested from an importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Split polygons (and strips/fans) into triangles.
    pub triangulate: bool,
    /// Flip texture coordinates vertically. Texture coordinates are not
    /// extracted by the viewer, so importers may ignore this.
    pub flip_uvs: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_uvs: true,
        }
    }
}

/// A mesh as handed back by an importer, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

/// Raw importer output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedScene {
    /// The importer could not read every part of the file.
    pub incomplete: bool,
    /// The scene has a root node to hang meshes from.
    pub has_root: bool,
    pub meshes: Vec<ImportedMesh>,
}

/// Errors raised by the underlying parsers. Messages are passed through
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Obj(#[from] tobj::LoadError),
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error("unsupported scene format: {0}")]
    UnsupportedFormat(String),
}

/// An external scene-file parser.
pub trait Importer {
    /// Parse the file at `path`. An `Err` means the importer produced no
    /// scene at all.
    fn import(&self, path: &Path, options: &ImportOptions) -> Result<ImportedScene, ImportError>;
}

/// Importer that dispatches on the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneImporter {
    obj: ObjImporter,
    gltf: GltfImporter,
}

impl SceneImporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Importer for SceneImporter {
    fn import(&self, path: &Path, options: &ImportOptions) -> Result<ImportedScene, ImportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "obj" => self.obj.import(path, options),
            "gltf" | "glb" => self.gltf.import(path, options),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
