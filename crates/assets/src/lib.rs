//! Scene import for the viewer.
//!
//! A scene file is handed to an [`Importer`] (OBJ via `tobj`, glTF via
//! `gltf`), and [`ModelLoader`] extracts the first mesh as a flat position
//! array plus a triangle index array.
//!
//! # Invariants
//! - A returned [`Mesh`] is never empty and every index is in range.
//! - A failed load never yields partial geometry.
//! - Only the first mesh of a scene is consumed.

mod gltf_scene;
mod importer;
mod loader;
mod mesh;
mod obj;

pub use gltf_scene::GltfImporter;
pub use importer::{ImportError, ImportOptions, ImportedMesh, ImportedScene, Importer, SceneImporter};
pub use loader::{ModelLoadError, ModelLoader};
pub use mesh::{Mesh, MeshError, MeshStats};
pub use obj::ObjImporter;
