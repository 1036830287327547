//! Post-processing applied to imported geometry.
//!
//! The backends deliver indexed triangles. The steps below rewrite them according
//! to [`ImportFlags`] before the mesh is frozen into the scene graph.

use cgmath::{InnerSpace, Matrix, SquareMatrix, Transform as _};

use crate::{
    data_structures::scene_graph::{ImportedMesh, MeshVertex},
    resources::ImportFlags,
};

/// Raw triangle data straight from a backend.
pub struct MeshData {
    pub name: String,
    pub local_transform: cgmath::Matrix4<f32>,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub has_normals: bool,
    pub has_tex_coords: bool,
}

pub fn finish_mesh(mut data: MeshData, flags: ImportFlags) -> ImportedMesh {
    if flags.contains(ImportFlags::FIND_DEGENERATES) {
        remove_degenerates(&mut data.indices);
    }
    if !flags.contains(ImportFlags::JOIN_IDENTICAL_VERTICES)
        || flags.contains(ImportFlags::GENERATE_NORMALS)
    {
        unweld(&mut data.vertices, &mut data.indices);
    }
    if flags.contains(ImportFlags::PRE_TRANSFORM_VERTICES) {
        pre_transform(&mut data.vertices, data.local_transform);
        data.local_transform = cgmath::Matrix4::identity();
    }
    if !data.has_normals
        && flags.intersects(ImportFlags::GENERATE_NORMALS | ImportFlags::GENERATE_SMOOTH_NORMALS)
    {
        // after unwelding no vertex is shared, so averaging yields flat normals
        generate_normals(&mut data.vertices, &data.indices);
    }
    if !data.has_tex_coords && flags.contains(ImportFlags::GENERATE_UV_COORDS) {
        generate_planar_uvs(&mut data.vertices);
    }
    if flags.contains(ImportFlags::FLIP_UVS) {
        data.vertices
            .iter_mut()
            .for_each(|v| v.tex_coords[1] = 1.0 - v.tex_coords[1]);
    }
    if flags.contains(ImportFlags::FLIP_WINDING_ORDER) {
        data.indices.chunks_exact_mut(3).for_each(|tri| tri.swap(1, 2));
    }
    ImportedMesh::new(data.name, data.local_transform, data.vertices, data.indices)
}

fn remove_degenerates(indices: &mut Vec<u32>) {
    let kept = indices
        .chunks_exact(3)
        .filter(|tri| tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2])
        .flatten()
        .copied()
        .collect();
    *indices = kept;
}

/// Gives every triangle corner its own vertex.
fn unweld(vertices: &mut Vec<MeshVertex>, indices: &mut Vec<u32>) {
    let expanded: Vec<MeshVertex> = indices
        .iter()
        .filter_map(|&i| vertices.get(i as usize).copied())
        .collect();
    *indices = (0..expanded.len() as u32).collect();
    *vertices = expanded;
}

fn pre_transform(vertices: &mut [MeshVertex], transform: cgmath::Matrix4<f32>) {
    let normal_matrix = transform
        .invert()
        .map(|inv| {
            cgmath::Matrix3::from_cols(inv.x.truncate(), inv.y.truncate(), inv.z.truncate())
                .transpose()
        })
        .unwrap_or_else(cgmath::Matrix3::identity);
    for v in vertices.iter_mut() {
        let p = transform.transform_point(cgmath::Point3::from(v.position));
        v.position = p.into();
        let n = normal_matrix * cgmath::Vector3::from(v.normal);
        if n.magnitude2() > 0.0 {
            v.normal = n.normalize().into();
        }
    }
}

fn generate_normals(vertices: &mut [MeshVertex], indices: &[u32]) {
    let mut sums = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let p0 = cgmath::Vector3::from(vertices[a].position);
        let p1 = cgmath::Vector3::from(vertices[b].position);
        let p2 = cgmath::Vector3::from(vertices[c].position);
        // area weighted: the cross product is not normalised
        let face = (p1 - p0).cross(p2 - p0);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }
    for (v, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > 0.0 {
            v.normal = sum.normalize().into();
        }
    }
}

/// Projects positions onto the XY plane of the mesh's bounding box.
fn generate_planar_uvs(vertices: &mut [MeshVertex]) {
    let Some(first) = vertices.first() else {
        return;
    };
    let (mut min, mut max) = (first.position, first.position);
    for v in vertices.iter() {
        for axis in 0..3 {
            min[axis] = min[axis].min(v.position[axis]);
            max[axis] = max[axis].max(v.position[axis]);
        }
    }
    let extent = [
        (max[0] - min[0]).max(f32::EPSILON),
        (max[1] - min[1]).max(f32::EPSILON),
    ];
    for v in vertices.iter_mut() {
        v.tex_coords = [
            (v.position[0] - min[0]) / extent[0],
            (v.position[1] - min[1]) / extent[1],
        ];
    }
}
