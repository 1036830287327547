//! The imported scene graph.
//!
//! This is what the importer hands over: an ordered list of parts, each with an
//! ordered list of meshes. It is read-only for the lifetime of a load. All
//! viewer-side customisation lives in the parallel override tree
//! (see [`crate::data_structures::overrides`]), which is aligned to this graph by
//! index, never by name.

/// A single vertex as uploaded to the GPU by the draw layer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

/// The smallest drawable unit: triangle geometry plus a transform relative to its part.
#[derive(Clone, Debug)]
pub struct ImportedMesh {
    name: String,
    local_transform: cgmath::Matrix4<f32>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl ImportedMesh {
    pub fn new(
        name: impl Into<String>,
        local_transform: cgmath::Matrix4<f32>,
        vertices: Vec<MeshVertex>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            local_transform,
            vertices,
            indices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> cgmath::Matrix4<f32> {
        self.local_transform
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A named group of meshes, usually one node of the source file's hierarchy.
#[derive(Clone, Debug)]
pub struct ImportedPart {
    name: String,
    meshes: Vec<ImportedMesh>,
}

impl ImportedPart {
    pub fn new(name: impl Into<String>, meshes: Vec<ImportedMesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[ImportedMesh] {
        &self.meshes
    }
}

#[derive(Clone, Debug)]
pub struct ImportedScene {
    name: String,
    parts: Vec<ImportedPart>,
}

impl ImportedScene {
    pub fn new(name: impl Into<String>, parts: Vec<ImportedPart>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }

    /// Display name of the model, the last segment of the path it was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &[ImportedPart] {
        &self.parts
    }

    pub fn mesh_count(&self) -> usize {
        self.parts.iter().map(|part| part.meshes.len()).sum()
    }

    pub fn face_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|part| part.meshes.iter())
            .map(ImportedMesh::face_count)
            .sum()
    }
}
