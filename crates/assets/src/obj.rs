use crate::importer::{ImportError, ImportOptions, ImportedMesh, ImportedScene, Importer};
use std::path::Path;

/// Wavefront OBJ importer backed by `tobj`.
///
/// Positions are kept in file order and indices refer to them directly.
/// Point and line elements are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjImporter;

impl Importer for ObjImporter {
    fn import(&self, path: &Path, options: &ImportOptions) -> Result<ImportedScene, ImportError> {
        let load_options = tobj::LoadOptions {
            triangulate: options.triangulate,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };

        let (models, materials) = tobj::load_obj(path, &load_options)?;
        if let Err(e) = materials {
            // Materials are not used by the viewer.
            tracing::debug!("ignoring OBJ materials for {}: {e}", path.display());
        }

        let mut scene = ImportedScene {
            incomplete: false,
            has_root: true,
            meshes: Vec::with_capacity(models.len()),
        };

        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                scene.incomplete = true;
            }
            let positions = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();

            let mut faces = Vec::with_capacity(mesh.indices.len() / 3);
            if mesh.face_arities.is_empty() {
                // Triangulated: every face has exactly three indices.
                if mesh.indices.len() % 3 != 0 {
                    scene.incomplete = true;
                }
                faces.extend(mesh.indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]));
            } else {
                let mut start = 0usize;
                for &arity in &mesh.face_arities {
                    let end = start + arity as usize;
                    match mesh.indices.get(start..end) {
                        Some(&[a, b, c]) => faces.push([a, b, c]),
                        _ => scene.incomplete = true,
                    }
                    start = end;
                }
            }

            scene.meshes.push(ImportedMesh {
                name: model.name,
                positions,
                faces,
            });
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn obj_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn quad_is_triangulated() {
        let file = obj_file(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        let scene = ObjImporter
            .import(file.path(), &ImportOptions::default())
            .unwrap();

        assert!(!scene.incomplete);
        assert!(scene.has_root);
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].positions.len(), 4);
        assert_eq!(scene.meshes[0].faces.len(), 2);
    }

    #[test]
    fn objects_become_separate_meshes() {
        let file = obj_file(
            "o first\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o second\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let scene = ObjImporter
            .import(file.path(), &ImportOptions::default())
            .unwrap();

        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.meshes[0].name, "first");
        assert_eq!(scene.meshes[1].faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = ObjImporter
            .import(Path::new("/nonexistent/model.obj"), &ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::Obj(_)));
    }
}
