use serde::Serialize;

/// Errors from validating extracted geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no geometry ({vertex_floats} vertex floats, {indices} indices)")]
    Empty { vertex_floats: usize, indices: usize },
    #[error("vertex array length {0} is not a multiple of 3")]
    RaggedVertices(usize),
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Immutable triangle mesh: flat `x, y, z` positions and 0-based triangle
/// indices into them.
///
/// Construction validates that the mesh is non-empty, both arrays are made of
/// whole triples, and every index references an existing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

/// Summary of a loaded mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub index_count: usize,
    pub triangle_count: usize,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

impl Mesh {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(MeshError::Empty {
                vertex_floats: vertices.len(),
                indices: indices.len(),
            });
        }
        if vertices.len() % 3 != 0 {
            return Err(MeshError::RaggedVertices(vertices.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }

        let vertex_count = vertices.len() / 3;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self { vertices, indices })
    }

    /// Flat position array, three floats per vertex.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn stats(&self) -> MeshStats {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in self.vertices.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }

        MeshStats {
            vertex_count: self.vertex_count(),
            index_count: self.index_count(),
            triangle_count: self.index_count() / 3,
            bounds_min: min,
            bounds_max: max,
        }
    }
}
