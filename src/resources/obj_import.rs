use std::path::Path;

use cgmath::SquareMatrix;

use crate::{
    data_structures::scene_graph::{ImportedPart, ImportedScene, MeshVertex},
    resources::{
        ImportFlags, ImportedModel, display_name,
        mesh::{MeshData, finish_mesh},
        texture::load_material_textures,
    },
};

/**
 * Wavefront OBJ import.
 *
 * `tobj` splits a file into one model per object/group and material. Models that
 * share a name form one part, so an object with several materials becomes a part
 * with several meshes. OBJ has no hierarchy, every mesh sits at the identity.
 */
pub fn load_obj(path: &Path, flags: ImportFlags) -> anyhow::Result<ImportedModel> {
    let (models, obj_materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: flags.contains(ImportFlags::TRIANGULATE),
            // one index buffer for positions, normals and texcoords
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = match obj_materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!("materials of {} could not be loaded: {}", path.display(), e);
            Vec::new()
        }
    };

    let mut parts: Vec<(String, Vec<MeshData>)> = Vec::new();
    for model in models {
        let m = &model.mesh;
        let vertices = (0..m.positions.len() / 3)
            .map(|i| MeshVertex {
                position: [
                    m.positions[i * 3],
                    m.positions[i * 3 + 1],
                    m.positions[i * 3 + 2],
                ],
                tex_coords: [
                    m.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    m.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    m.normals.get(i * 3).map_or(0.0, |f| *f),
                    m.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    m.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            })
            .collect::<Vec<_>>();

        let mesh_name = m
            .material_id
            .and_then(|id| materials.get(id))
            .map(|material| material.name.clone())
            .unwrap_or_else(|| model.name.clone());
        let data = MeshData {
            name: mesh_name,
            local_transform: cgmath::Matrix4::identity(),
            has_normals: !m.normals.is_empty(),
            has_tex_coords: !m.texcoords.is_empty(),
            vertices,
            // without triangulation tobj keeps polygons and reports their arities
            indices: fan_triangulate(&m.indices, &m.face_arities),
        };

        match parts.iter_mut().find(|(name, _)| *name == model.name) {
            Some((_, meshes)) => meshes.push(data),
            None => parts.push((model.name.clone(), vec![data])),
        }
    }

    let parts = parts
        .into_iter()
        .map(|(name, meshes)| {
            let meshes = meshes
                .into_iter()
                .map(|data| finish_mesh(data, flags))
                .collect();
            ImportedPart::new(name, meshes)
        })
        .collect();

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let texture_files = materials
        .iter()
        .filter_map(|material| material.diffuse_texture.clone())
        .collect::<Vec<_>>();
    let textures = load_material_textures(base_dir, &texture_files);

    let name = display_name(&path.to_string_lossy()).to_string();
    Ok(ImportedModel {
        scene: ImportedScene::new(name, parts),
        textures,
    })
}

/// Splits every polygon into a triangle fan around its first corner.
///
/// An empty `arities` means every face already is a triangle.
fn fan_triangulate(indices: &[u32], arities: &[u32]) -> Vec<u32> {
    if arities.is_empty() {
        return indices.to_vec();
    }
    let mut triangles = Vec::with_capacity(indices.len() * 2);
    let mut start = 0;
    for &arity in arities {
        let arity = arity as usize;
        let Some(face) = indices.get(start..start + arity) else {
            log::warn!("face arities exceed the index buffer, dropping the remaining faces");
            break;
        };
        for i in 1..arity.saturating_sub(1) {
            triangles.extend_from_slice(&[face[0], face[i], face[i + 1]]);
        }
        start += arity;
    }
    triangles
}
