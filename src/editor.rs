//! Editing operations behind the GUI.
//!
//! The GUI layer owns no model state. Each widget calls one of these functions
//! with the part and mesh indices it was drawn for; the functions apply the edit
//! to the override tree and keep the propagation rule intact. Orientation is
//! edited in yaw/pitch/roll degrees, scale either as one value or per axis.

use anyhow::bail;

use crate::data_structures::{
    overrides::ModelOverrides,
    texture::{TextureId, TextureInfo, TextureRegistry, TextureSource},
    transform::{ScaleMode, Transform, YawPitchRoll},
};

/// Which transform an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Model,
    Mesh { part: usize, mesh: usize },
}

/// A scale edit as it comes out of the widgets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleEdit {
    Uniform(f32),
    PerAxis(cgmath::Vector3<f32>),
}

fn transform_mut(model: &mut ModelOverrides, target: Target) -> &mut Transform {
    match target {
        Target::Model => &mut model.transform,
        Target::Mesh { part, mesh } => &mut model.mesh_mut(part, mesh).transform,
    }
}

fn transform(model: &ModelOverrides, target: Target) -> &Transform {
    match target {
        Target::Model => &model.transform,
        Target::Mesh { part, mesh } => &model.mesh(part, mesh).transform,
    }
}

pub fn set_model_use_parent_transform(model: &mut ModelOverrides, enabled: bool) {
    model.set_use_parent_transform(enabled);
}

pub fn set_part_use_parent_transform(model: &mut ModelOverrides, part: usize, enabled: bool) {
    model.part_mut(part).set_use_parent_transform(enabled);
}

/// Mesh toggles never cascade.
pub fn set_mesh_use_parent_transform(
    model: &mut ModelOverrides,
    part: usize,
    mesh: usize,
    enabled: bool,
) {
    model.mesh_mut(part, mesh).use_parent_transform = enabled;
}

pub fn set_position(model: &mut ModelOverrides, target: Target, position: cgmath::Vector3<f32>) {
    transform_mut(model, target).position = position;
}

/// Moves the model back to the origin.
pub fn recenter(model: &mut ModelOverrides) {
    model.transform.position = cgmath::Vector3::new(0.0, 0.0, 0.0);
}

pub fn rotation(model: &ModelOverrides, target: Target) -> YawPitchRoll {
    transform(model, target).yaw_pitch_roll()
}

pub fn set_rotation(model: &mut ModelOverrides, target: Target, angles: YawPitchRoll) {
    transform_mut(model, target).set_yaw_pitch_roll(angles);
}

pub fn set_scale_mode(model: &mut ModelOverrides, mode: ScaleMode) {
    // values are only rewritten by the next edit
    model.scale_mode = mode;
}

pub fn set_scale(model: &mut ModelOverrides, target: Target, edit: ScaleEdit) {
    let transform = transform_mut(model, target);
    match edit {
        ScaleEdit::Uniform(scale) => transform.set_uniform_scale(scale),
        ScaleEdit::PerAxis(scale) => transform.scale = scale,
    }
}

pub fn set_color(model: &mut ModelOverrides, part: usize, mesh: usize, color: cgmath::Vector3<f32>) {
    model.mesh_mut(part, mesh).color = color;
}

pub fn set_use_texture(model: &mut ModelOverrides, part: usize, mesh: usize, enabled: bool) {
    model.mesh_mut(part, mesh).use_texture = enabled;
}

/// Assigns a registered texture to a mesh. Unknown ids are rejected.
pub fn assign_texture<T: TextureSource>(
    model: &mut ModelOverrides,
    textures: &TextureRegistry<T>,
    part: usize,
    mesh: usize,
    texture: TextureId,
) -> anyhow::Result<()> {
    if !textures.contains(texture) {
        bail!("texture {:?} is not registered", texture);
    }
    model.mesh_mut(part, mesh).texture = Some(texture);
    Ok(())
}

pub fn clear_texture(model: &mut ModelOverrides, part: usize, mesh: usize) {
    model.mesh_mut(part, mesh).texture = None;
}

pub fn set_locating(model: &mut ModelOverrides, part: usize, mesh: usize, locating: bool) {
    model.mesh_mut(part, mesh).locating = locating;
}

/// Status text shown next to the texture picker of a mesh.
pub fn texture_label<T: TextureSource>(
    model: &ModelOverrides,
    textures: &TextureRegistry<T>,
    part: usize,
    mesh: usize,
) -> String {
    match model.mesh(part, mesh).texture.and_then(|id| textures.get(id)) {
        Some(texture) => format!("Texture: {}", texture.label()),
        None => "Texture not set".to_string(),
    }
}

/// One tile of the texture picker.
#[derive(Clone, Debug, PartialEq)]
pub struct PickerEntry {
    pub info: TextureInfo,
    pub size: [f32; 2],
}

/// The picker tiles in registration order, each sized to fit `max_size`.
pub fn texture_picker<T: TextureSource>(
    textures: &TextureRegistry<T>,
    max_size: f32,
) -> Vec<PickerEntry> {
    textures
        .list()
        .into_iter()
        .map(|info| {
            let size = info.preview_size(max_size);
            PickerEntry { info, size }
        })
        .collect()
}
