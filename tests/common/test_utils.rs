use std::path::{Path, PathBuf};

use model_viewer::{
    Matrix4, SquareMatrix,
    data_structures::{
        scene_graph::{ImportedMesh, ImportedPart, ImportedScene, MeshVertex},
        texture::Texture,
    },
};

pub fn triangle(name: &str, local: Matrix4<f32>) -> ImportedMesh {
    let vertices = vec![
        MeshVertex {
            position: [0.0, 0.0, 0.0],
            ..Default::default()
        },
        MeshVertex {
            position: [1.0, 0.0, 0.0],
            ..Default::default()
        },
        MeshVertex {
            position: [0.0, 1.0, 0.0],
            ..Default::default()
        },
    ];
    ImportedMesh::new(name, local, vertices, vec![0, 1, 2])
}

/// A scene with one part per entry of `layout`, each holding that many triangles.
pub fn scene(layout: &[usize]) -> ImportedScene {
    let parts = layout
        .iter()
        .enumerate()
        .map(|(p, &count)| {
            let meshes = (0..count)
                .map(|m| triangle(&format!("mesh_{}_{}", p, m), Matrix4::identity()))
                .collect();
            ImportedPart::new(format!("part_{}", p), meshes)
        })
        .collect();
    ImportedScene::new("fixture.obj", parts)
}

pub fn texture(name: &str, width: u32, height: u32) -> Texture {
    Texture {
        label: name.to_string(),
        image: image::RgbaImage::new(width, height),
    }
}

pub const TWO_OBJECTS_OBJ: &str = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
f 1 2 3
f 2 4 3
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 5 6 7
";

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::new(width, height)
        .save(&path)
        .expect("failed to write png fixture");
    path
}

/// A node `body` translated by (1, 2, 3) whose child `wheel` is translated by
/// (0, 0, 5) and carries one triangle.
pub const NESTED_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [
    { "name": "body", "translation": [1.0, 2.0, 3.0], "children": [1] },
    { "name": "wheel", "translation": [0.0, 0.0, 5.0], "mesh": 0 }
  ],
  "meshes": [{
    "name": "rim",
    "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
  }],
  "buffers": [{
    "byteLength": 44,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "accessors": [
    {
      "bufferView": 0,
      "componentType": 5126,
      "count": 3,
      "type": "VEC3",
      "min": [0.0, 0.0, 0.0],
      "max": [1.0, 1.0, 0.0]
    },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ]
}"#;

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::new(width, height)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("failed to encode png fixture");
    bytes
}

/// One triangle with two images: `paint` (3x2) stored in a buffer view and
/// `decal` (5x4) inlined as a base64 data URI.
pub fn textured_gltf() -> String {
    use base64::Engine as _;
    let engine = base64::engine::general_purpose::STANDARD;

    let mut buffer = Vec::new();
    for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
    for index in [0u16, 1, 2, 0] {
        buffer.extend_from_slice(&index.to_le_bytes());
    }
    let paint = png_bytes(3, 2);
    buffer.extend_from_slice(&paint);

    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "panel", "mesh": 0 }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1 }}] }}],
  "buffers": [{{
    "byteLength": {buffer_len},
    "uri": "data:application/octet-stream;base64,{buffer}"
  }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }},
    {{ "buffer": 0, "byteOffset": 44, "byteLength": {paint_len} }}
  ],
  "accessors": [
    {{
      "bufferView": 0,
      "componentType": 5126,
      "count": 3,
      "type": "VEC3",
      "min": [0.0, 0.0, 0.0],
      "max": [1.0, 1.0, 0.0]
    }},
    {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ],
  "images": [
    {{ "name": "paint", "bufferView": 2, "mimeType": "image/png" }},
    {{ "name": "decal", "uri": "data:image/png;base64,{decal}" }}
  ]
}}"#,
        buffer_len = buffer.len(),
        buffer = engine.encode(&buffer),
        paint_len = paint.len(),
        decal = engine.encode(png_bytes(5, 4)),
    )
}
