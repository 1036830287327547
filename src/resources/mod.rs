use std::path::Path;

use anyhow::{Context, bail};
use bitflags::bitflags;

use crate::data_structures::{scene_graph::ImportedScene, texture::Texture};

/**
 * This module contains all logic for importing models and textures from external files.
 *
 * Parsing is left to `tobj` (Wavefront OBJ) and `gltf` (glTF / GLB); decoding images
 * is left to `image`. What happens here is mapping their output onto
 * [`ImportedScene`] and applying the post-processing steps the user picked.
 */
pub mod gltf_import;
pub mod mesh;
pub mod obj_import;
pub mod texture;

bitflags! {
    /// Post-processing steps requested from the importer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ImportFlags: u32 {
        const TRIANGULATE = 1 << 0;
        const GENERATE_SMOOTH_NORMALS = 1 << 1;
        const GENERATE_NORMALS = 1 << 2;
        const GENERATE_UV_COORDS = 1 << 3;
        const JOIN_IDENTICAL_VERTICES = 1 << 4;
        const SORT_BY_PRIMITIVE_TYPE = 1 << 5;
        const FLIP_UVS = 1 << 6;
        const IMPROVE_CACHE_LOCALITY = 1 << 7;
        const OPTIMIZE_GRAPH = 1 << 8;
        const OPTIMIZE_MESHES = 1 << 9;
        const LIMIT_BONE_WEIGHTS = 1 << 10;
        const FIND_DEGENERATES = 1 << 11;
        const FIX_INFACING_NORMALS = 1 << 12;
        const PRE_TRANSFORM_VERTICES = 1 << 13;
        const FLIP_WINDING_ORDER = 1 << 14;
        const SPLIT_LARGE_MESHES = 1 << 15;
    }
}

impl ImportFlags {
    /// Steps the backends in this crate know how to apply.
    pub const SUPPORTED: Self = Self::TRIANGULATE
        .union(Self::GENERATE_SMOOTH_NORMALS)
        .union(Self::GENERATE_NORMALS)
        .union(Self::GENERATE_UV_COORDS)
        .union(Self::JOIN_IDENTICAL_VERTICES)
        .union(Self::SORT_BY_PRIMITIVE_TYPE)
        .union(Self::FLIP_UVS)
        .union(Self::FIND_DEGENERATES)
        .union(Self::PRE_TRANSFORM_VERTICES)
        .union(Self::FLIP_WINDING_ORDER);

    /// Toggles `flag`. Smooth and flat normal generation exclude each other, so
    /// turning one on turns the other off.
    pub fn toggle_step(&mut self, flag: ImportFlags) {
        self.toggle(flag);
        if self.contains(Self::GENERATE_SMOOTH_NORMALS) && flag == Self::GENERATE_SMOOTH_NORMALS {
            self.remove(Self::GENERATE_NORMALS);
        }
        if self.contains(Self::GENERATE_NORMALS) && flag == Self::GENERATE_NORMALS {
            self.remove(Self::GENERATE_SMOOTH_NORMALS);
        }
    }
}

impl Default for ImportFlags {
    fn default() -> Self {
        Self::TRIANGULATE
            | Self::GENERATE_SMOOTH_NORMALS
            | Self::GENERATE_UV_COORDS
            | Self::JOIN_IDENTICAL_VERTICES
            | Self::SORT_BY_PRIMITIVE_TYPE
            | Self::FLIP_UVS
            | Self::IMPROVE_CACHE_LOCALITY
    }
}

/// Everything one import produced: the scene and the textures its materials reference.
pub struct ImportedModel {
    pub scene: ImportedScene,
    pub textures: Vec<Texture>,
}

/// Imports the model at `path`, choosing the backend by file extension.
///
/// Fails without side effects; the caller keeps whatever it had loaded before.
pub fn import_model(path: &Path, flags: ImportFlags) -> anyhow::Result<ImportedModel> {
    let ignored = flags.difference(ImportFlags::SUPPORTED);
    if !ignored.is_empty() {
        log::debug!("import steps not applied by this importer: {:?}", ignored);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let model = match extension.as_str() {
        "obj" => obj_import::load_obj(path, flags),
        "gltf" | "glb" => gltf_import::load_gltf(path, flags),
        _ => bail!("unsupported model format '{}'", extension),
    }
    .with_context(|| format!("failed to import model {}", path.display()))?;

    if model.scene.parts().is_empty() {
        bail!("model {} contains no meshes", path.display());
    }
    log::info!(
        "imported {}: {} parts, {} meshes, {} faces, {} textures",
        model.scene.name(),
        model.scene.parts().len(),
        model.scene.mesh_count(),
        model.scene.face_count(),
        model.textures.len()
    );
    Ok(model)
}

/// Last path segment, accepting both `/` and `\` as separators.
pub fn display_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
