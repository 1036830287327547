use std::path::Path;

use anyhow::Context;
use base64::Engine as _;
use cgmath::SquareMatrix;

use crate::{
    data_structures::{
        scene_graph::{ImportedMesh, ImportedPart, ImportedScene, MeshVertex},
        texture::Texture,
    },
    resources::{
        ImportFlags, ImportedModel, display_name,
        mesh::{MeshData, finish_mesh},
        texture::{load_texture, texture_from_bytes},
    },
};

/**
 * glTF / GLB import.
 *
 * Every node that carries a mesh becomes one part and each of its triangle
 * primitives one mesh. A mesh's local transform is the node's transform composed
 * with all of its ancestors', so the part hierarchy is flattened at import time.
 */
pub fn load_gltf(path: &Path, flags: ImportFlags) -> anyhow::Result<ImportedModel> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let gltf = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&gltf.document, Some(base_dir), gltf.blob.clone())?;

    let mut parts = Vec::new();
    let scenes = match gltf.default_scene() {
        Some(scene) => vec![scene],
        None => gltf.scenes().collect(),
    };
    for scene in scenes {
        for node in scene.nodes() {
            collect_parts(node, cgmath::Matrix4::identity(), &buffers, flags, &mut parts);
        }
    }

    let model_name = display_name(&path.to_string_lossy()).to_string();
    let mut textures = Vec::new();
    for (idx, image) in gltf.images().enumerate() {
        match load_image(image, idx, &model_name, base_dir, &buffers) {
            Ok(texture) => textures.push(texture),
            Err(e) => log::warn!("skipping image {} of {}: {:#}", idx, model_name, e),
        }
    }

    Ok(ImportedModel {
        scene: ImportedScene::new(model_name, parts),
        textures,
    })
}

fn collect_parts(
    node: gltf::Node,
    parent: cgmath::Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    flags: ImportFlags,
    parts: &mut Vec<ImportedPart>,
) {
    let local: cgmath::Matrix4<f32> = node.transform().matrix().into();
    let global = parent * local;

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("mesh").to_string();
        let meshes = mesh
            .primitives()
            .enumerate()
            .filter_map(|(idx, primitive)| {
                read_primitive(&primitive, format!("{}_{}", mesh_name, idx), global, buffers, flags)
            })
            .collect::<Vec<_>>();
        if !meshes.is_empty() {
            let part_name = node
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("node_{}", node.index()));
            parts.push(ImportedPart::new(part_name, meshes));
        }
    }

    for child in node.children() {
        collect_parts(child, global, buffers, flags, parts);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    name: String,
    transform: cgmath::Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    flags: ImportFlags,
) -> Option<ImportedMesh> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        // points and lines have no faces to shade
        log::debug!("skipping {} with primitive mode {:?}", name, primitive.mode());
        return None;
    }
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

    let mut vertices = Vec::new();
    if let Some(positions) = reader.read_positions() {
        positions.for_each(|position| {
            vertices.push(MeshVertex {
                position,
                ..Default::default()
            })
        });
    }
    if vertices.is_empty() {
        log::warn!("primitive {} has no positions", name);
        return None;
    }

    let mut has_normals = false;
    if let Some(normals) = reader.read_normals() {
        has_normals = true;
        vertices
            .iter_mut()
            .zip(normals)
            .for_each(|(vertex, normal)| vertex.normal = normal);
    }
    let mut has_tex_coords = false;
    if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
        has_tex_coords = true;
        vertices
            .iter_mut()
            .zip(tex_coords)
            .for_each(|(vertex, uv)| vertex.tex_coords = uv);
    }

    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    Some(finish_mesh(
        MeshData {
            name,
            local_transform: transform,
            vertices,
            indices,
            has_normals,
            has_tex_coords,
        },
        flags,
    ))
}

fn load_image(
    image: gltf::Image,
    idx: usize,
    model_name: &str,
    base_dir: &Path,
    buffers: &[gltf::buffer::Data],
) -> anyhow::Result<Texture> {
    match image.source() {
        gltf::image::Source::View { view, mime_type } => {
            let label = image
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} image {}", model_name, idx));
            let buffer = buffers
                .get(view.buffer().index())
                .ok_or_else(|| anyhow::anyhow!("image {} points at a missing buffer", idx))?;
            let bytes = buffer
                .get(view.offset()..view.offset() + view.length())
                .ok_or_else(|| anyhow::anyhow!("image {} overruns its buffer", idx))?;
            texture_from_bytes(bytes, &label, mime_type.split('/').last())
        }
        gltf::image::Source::Uri { uri, mime_type } => match uri.strip_prefix("data:") {
            Some(data) => {
                let label = image
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} image {}", model_name, idx));
                let (mime, bytes) = decode_data_uri(data)
                    .with_context(|| format!("image {} has a malformed data URI", idx))?;
                let hint = mime_type.or(mime).and_then(|mime| mime.split('/').last());
                texture_from_bytes(&bytes, &label, hint)
            }
            None => load_texture(&base_dir.join(uri)),
        },
    }
}

/// Splits `<mime>;base64,<payload>` (the part after `data:`) and decodes the payload.
fn decode_data_uri(data: &str) -> anyhow::Result<(Option<&str>, Vec<u8>)> {
    let Some((header, payload)) = data.split_once(',') else {
        anyhow::bail!("missing ',' separator");
    };
    let Some(mime) = header.strip_suffix(";base64") else {
        anyhow::bail!("only base64 payloads are supported");
    };
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    Ok(((!mime.is_empty()).then_some(mime), bytes))
}
