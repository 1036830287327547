//! Per-frame override resolution and the hand-off to the draw layer.
//!
//! Every frame the imported scene and the override tree are walked in lock-step.
//! For each mesh the resolver produces a [`DrawParams`]: the world matrix, the
//! shading color and the texture to bind, if any. The draw layer receives them
//! through [`MeshRenderer`] and issues one draw call per mesh.
//!
//! Resolution is a pure function of the scene, the override tree, the texture
//! registry and the elapsed time. Nothing is cached between frames and nothing is
//! written back.
//!
//! # Highlight mode
//!
//! When at least one mesh is flagged `locating`, everything except the flagged
//! meshes is dimmed, and the flagged ones rainbow-pulse in unison.

use crate::data_structures::{
    overrides::{MeshOverrides, ModelOverrides},
    scene_graph::{ImportedMesh, ImportedScene},
    texture::{TextureId, TextureRegistry, TextureSource},
};

/// Factor applied to the color of meshes that are not being located.
pub const HIGHLIGHT_DIM: f32 = 0.1;

/// What the draw layer needs to render one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawParams {
    pub part: usize,
    pub mesh: usize,
    pub world: cgmath::Matrix4<f32>,
    pub color: cgmath::Vector3<f32>,
    pub use_texture: bool,
    pub texture: Option<TextureId>,
}

impl DrawParams {
    pub fn to_raw(&self) -> DrawParamsRaw {
        DrawParamsRaw {
            world: self.world.into(),
            color: self.color.into(),
            use_texture: if self.use_texture { 1 } else { 0 },
        }
    }
}

/// Consumer of resolved draws, implemented by the GPU layer.
pub trait MeshRenderer<T: TextureSource> {
    fn draw_mesh(&mut self, mesh: &ImportedMesh, params: &DrawParams, texture: Option<&T>);
}

/**
 * The raw draw parameters as laid out in GPU memory: a world matrix, the shading
 * color and an integer texture toggle (the shader branches on it).
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawParamsRaw {
    pub world: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub use_texture: u32,
}

impl DrawParamsRaw {
    /**
     * Layout for uploading draw parameters as a per-instance vertex buffer.
     *
     * Stride layout: the world matrix as four vec4 columns, then color, then the toggle.
     */
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<DrawParamsRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

/// The locate color at `elapsed` seconds: `(sin t, tan t, cos t)` mapped by `x * 0.5 + 0.5`.
///
/// The green channel follows `tan` and is unbounded near `t = π/2 + kπ`.
pub fn pulse_color(elapsed: f32) -> cgmath::Vector3<f32> {
    cgmath::Vector3::new(
        elapsed.sin() * 0.5 + 0.5,
        elapsed.tan() * 0.5 + 0.5,
        elapsed.cos() * 0.5 + 0.5,
    )
}

/// World matrix of one mesh: either inherited from the imported chain under the
/// model transform, or the override's own transform and nothing else.
pub fn resolve_world(
    model: &ModelOverrides,
    mesh: &ImportedMesh,
    overrides: &MeshOverrides,
) -> cgmath::Matrix4<f32> {
    if overrides.use_parent_transform {
        model.transform.to_matrix() * mesh.local_transform()
    } else {
        overrides.transform.to_matrix()
    }
}

/// Resolves every mesh of `scene` for one frame, in part then mesh order.
///
/// # Panics
///
/// If `overrides` was not built for `scene`: the two trees are aligned by index and
/// a mismatch is a bug, not something to paper over.
pub fn resolve_frame<T: TextureSource>(
    scene: &ImportedScene,
    overrides: &ModelOverrides,
    textures: &TextureRegistry<T>,
    elapsed: f32,
) -> Vec<DrawParams> {
    assert!(
        overrides.is_aligned_with(scene),
        "override tree does not match the imported scene {}",
        scene.name()
    );

    let locating = overrides.any_locating();
    let pulse = pulse_color(elapsed);

    scene
        .parts()
        .iter()
        .zip(overrides.parts())
        .enumerate()
        .flat_map(|(p, (part, part_overrides))| {
            part.meshes()
                .iter()
                .zip(part_overrides.meshes())
                .enumerate()
                .map(move |(m, (mesh, mesh_overrides))| {
                    let color = match (locating, mesh_overrides.locating) {
                        (true, true) => pulse,
                        (true, false) => mesh_overrides.color * HIGHLIGHT_DIM,
                        (false, _) => mesh_overrides.color,
                    };
                    let texture = if mesh_overrides.use_texture {
                        mesh_overrides.texture.filter(|&id| textures.contains(id))
                    } else {
                        None
                    };
                    DrawParams {
                        part: p,
                        mesh: m,
                        world: resolve_world(overrides, mesh, mesh_overrides),
                        color,
                        use_texture: texture.is_some(),
                        texture,
                    }
                })
        })
        .collect()
}

/// Resolves one frame and hands every mesh to `renderer`.
pub fn draw_frame<T: TextureSource>(
    scene: &ImportedScene,
    overrides: &ModelOverrides,
    textures: &TextureRegistry<T>,
    elapsed: f32,
    renderer: &mut dyn MeshRenderer<T>,
) {
    let draws = resolve_frame(scene, overrides, textures, elapsed);
    log::debug!("drawing {} meshes of {}", draws.len(), scene.name());
    for params in &draws {
        let mesh = &scene.parts()[params.part].meshes()[params.mesh];
        let texture = params.texture.and_then(|id| textures.get(id));
        renderer.draw_mesh(mesh, params, texture);
    }
}
