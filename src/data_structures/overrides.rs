//! The override tree: model root, part groups and mesh entries.
//!
//! The tree shadows an [`ImportedScene`] by structural index. It is built once per
//! successful import and dropped with it; parts and meshes are never added,
//! removed or reordered afterwards.
//!
//! Enabling `use_parent_transform` propagates downwards only:
//! - on the root it forces every mesh back to inheriting (part flags stay as they are),
//! - on a part it forces that part's meshes back to inheriting,
//! - on a mesh it affects nothing else.
//!
//! Disabling a flag never cascades.

use crate::data_structures::{
    scene_graph::ImportedScene,
    texture::TextureId,
    transform::{ScaleMode, Transform},
};

#[derive(Clone, Debug, PartialEq)]
pub struct MeshOverrides {
    pub transform: Transform,
    pub color: cgmath::Vector3<f32>,
    pub use_texture: bool,
    pub texture: Option<TextureId>,
    pub use_parent_transform: bool,
    /// Highlight flag for finding a mesh on screen. Never persisted.
    pub locating: bool,
}

impl MeshOverrides {
    pub fn new() -> Self {
        Self {
            transform: Transform::new(),
            color: cgmath::Vector3::new(1.0, 1.0, 1.0),
            use_texture: false,
            texture: None,
            use_parent_transform: true,
            locating: false,
        }
    }
}

impl Default for MeshOverrides {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartOverrides {
    use_parent_transform: bool,
    meshes: Vec<MeshOverrides>,
}

impl PartOverrides {
    pub fn new(mesh_count: usize) -> Self {
        Self {
            use_parent_transform: true,
            meshes: (0..mesh_count).map(|_| MeshOverrides::new()).collect(),
        }
    }

    pub fn use_parent_transform(&self) -> bool {
        self.use_parent_transform
    }

    pub fn set_use_parent_transform(&mut self, enabled: bool) {
        self.use_parent_transform = enabled;
        if enabled {
            self.meshes
                .iter_mut()
                .for_each(|mesh| mesh.use_parent_transform = true);
        }
    }

    pub fn meshes(&self) -> &[MeshOverrides] {
        &self.meshes
    }

    /// # Panics
    ///
    /// If `idx` is out of range. Indices come from the imported scene, so a miss
    /// means the two trees went out of sync.
    pub fn mesh(&self, idx: usize) -> &MeshOverrides {
        &self.meshes[idx]
    }

    /// # Panics
    ///
    /// If `idx` is out of range, see [`mesh`](Self::mesh).
    pub fn mesh_mut(&mut self, idx: usize) -> &mut MeshOverrides {
        &mut self.meshes[idx]
    }

    pub(crate) fn meshes_mut(&mut self) -> &mut [MeshOverrides] {
        &mut self.meshes
    }

    /// Sets the flag without touching the meshes, for restoring saved state.
    pub(crate) fn set_use_parent_transform_flag(&mut self, enabled: bool) {
        self.use_parent_transform = enabled;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelOverrides {
    pub transform: Transform,
    pub scale_mode: ScaleMode,
    use_parent_transform: bool,
    parts: Vec<PartOverrides>,
}

impl ModelOverrides {
    /// Allocates one part group per imported part and one mesh entry per imported
    /// mesh, all with default values.
    pub fn from_scene(scene: &ImportedScene) -> Self {
        let parts = scene
            .parts()
            .iter()
            .map(|part| PartOverrides::new(part.meshes().len()))
            .collect();
        Self {
            transform: Transform::new(),
            scale_mode: ScaleMode::default(),
            use_parent_transform: true,
            parts,
        }
    }

    pub fn use_parent_transform(&self) -> bool {
        self.use_parent_transform
    }

    pub fn set_use_parent_transform(&mut self, enabled: bool) {
        self.use_parent_transform = enabled;
        if enabled {
            // part flags keep their value, only the meshes are forced
            self.parts
                .iter_mut()
                .flat_map(|part| part.meshes.iter_mut())
                .for_each(|mesh| mesh.use_parent_transform = true);
        }
    }

    pub fn parts(&self) -> &[PartOverrides] {
        &self.parts
    }

    /// # Panics
    ///
    /// If `idx` is out of range for the imported scene this tree shadows.
    pub fn part(&self, idx: usize) -> &PartOverrides {
        &self.parts[idx]
    }

    /// # Panics
    ///
    /// If `idx` is out of range, see [`part`](Self::part).
    pub fn part_mut(&mut self, idx: usize) -> &mut PartOverrides {
        &mut self.parts[idx]
    }

    /// # Panics
    ///
    /// If either index is out of range.
    pub fn mesh(&self, part: usize, mesh: usize) -> &MeshOverrides {
        self.part(part).mesh(mesh)
    }

    /// # Panics
    ///
    /// If either index is out of range.
    pub fn mesh_mut(&mut self, part: usize, mesh: usize) -> &mut MeshOverrides {
        self.part_mut(part).mesh_mut(mesh)
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshOverrides> {
        self.parts.iter().flat_map(|part| part.meshes.iter())
    }

    pub fn any_locating(&self) -> bool {
        self.meshes().any(|mesh| mesh.locating)
    }

    pub fn clear_locating(&mut self) {
        self.parts
            .iter_mut()
            .flat_map(|part| part.meshes.iter_mut())
            .for_each(|mesh| mesh.locating = false);
    }

    /// Whether this tree has exactly the part/mesh layout of `scene`.
    pub fn is_aligned_with(&self, scene: &ImportedScene) -> bool {
        self.parts.len() == scene.parts().len()
            && self
                .parts
                .iter()
                .zip(scene.parts())
                .all(|(overrides, part)| overrides.meshes.len() == part.meshes().len())
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [PartOverrides] {
        &mut self.parts
    }

    pub(crate) fn set_use_parent_transform_flag(&mut self, enabled: bool) {
        self.use_parent_transform = enabled;
    }
}
