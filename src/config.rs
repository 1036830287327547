//! Viewer settings and saved override configurations.
//!
//! [`ViewerConfig`] holds the knobs of a viewer session. [`OverrideConfig`] is a
//! snapshot of an override tree that can be written to disk as RON and applied to
//! a later load of the same model. Textures are stored by name since ids do not
//! survive a restart, and the `locating` highlight is never saved.

use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{
        overrides::ModelOverrides,
        texture::{TextureRegistry, TextureSource},
        transform::{ScaleMode, Transform},
    },
    resources::ImportFlags,
};

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub import_flags: ImportFlags,
    /// Longer side of a texture picker tile, in pixels.
    pub texture_preview_size: f32,
    /// How long a status message stays up, in seconds.
    pub status_duration: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            import_flags: ImportFlags::default(),
            texture_preview_size: 150.0,
            status_duration: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub transform: Transform,
    pub color: [f32; 3],
    pub use_texture: bool,
    #[serde(default)]
    pub texture: Option<String>,
    pub use_parent_transform: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartConfig {
    pub use_parent_transform: bool,
    pub meshes: Vec<MeshConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideConfig {
    pub model: String,
    pub transform: Transform,
    pub scale_mode: ScaleMode,
    pub use_parent_transform: bool,
    pub parts: Vec<PartConfig>,
}

impl OverrideConfig {
    pub fn capture<T: TextureSource>(
        model_name: &str,
        overrides: &ModelOverrides,
        textures: &TextureRegistry<T>,
    ) -> Self {
        let parts = overrides
            .parts()
            .iter()
            .map(|part| PartConfig {
                use_parent_transform: part.use_parent_transform(),
                meshes: part
                    .meshes()
                    .iter()
                    .map(|mesh| MeshConfig {
                        transform: mesh.transform,
                        color: mesh.color.into(),
                        use_texture: mesh.use_texture,
                        texture: mesh
                            .texture
                            .and_then(|id| textures.get(id))
                            .map(|texture| texture.label().to_string()),
                        use_parent_transform: mesh.use_parent_transform,
                    })
                    .collect(),
            })
            .collect();
        Self {
            model: model_name.to_string(),
            transform: overrides.transform,
            scale_mode: overrides.scale_mode,
            use_parent_transform: overrides.use_parent_transform(),
            parts,
        }
    }

    /// Writes the saved state into `overrides`.
    ///
    /// The layout is checked before anything is touched, so a config saved for a
    /// different model fails without a partial apply. Texture names that are not
    /// registered leave the mesh without a texture.
    pub fn apply<T: TextureSource>(
        &self,
        overrides: &mut ModelOverrides,
        textures: &TextureRegistry<T>,
    ) -> anyhow::Result<()> {
        if self.parts.len() != overrides.parts().len() {
            bail!(
                "config for {} has {} parts, the loaded model has {}",
                self.model,
                self.parts.len(),
                overrides.parts().len()
            );
        }
        for (idx, (saved, part)) in self.parts.iter().zip(overrides.parts()).enumerate() {
            if saved.meshes.len() != part.meshes().len() {
                bail!(
                    "config for {} has {} meshes in part {}, the loaded model has {}",
                    self.model,
                    saved.meshes.len(),
                    idx,
                    part.meshes().len()
                );
            }
        }

        overrides.transform = self.transform;
        overrides.scale_mode = self.scale_mode;
        overrides.set_use_parent_transform_flag(self.use_parent_transform);
        for (saved, part) in self.parts.iter().zip(overrides.parts_mut()) {
            part.set_use_parent_transform_flag(saved.use_parent_transform);
            for (saved, mesh) in saved.meshes.iter().zip(part.meshes_mut()) {
                mesh.transform = saved.transform;
                mesh.color = saved.color.into();
                mesh.use_texture = saved.use_texture;
                mesh.use_parent_transform = saved.use_parent_transform;
                mesh.texture = saved.texture.as_deref().and_then(|name| {
                    let found = textures.find_by_name(name);
                    if found.is_none() {
                        log::warn!("texture {} from config {} is not loaded", name, self.model);
                    }
                    found
                });
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .indentor("  ".to_string());
        let ron_data = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, ron_data)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let ron_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = ron::from_str(&ron_str)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}
