use std::path::PathBuf;

use anyhow::Context;
use model_viewer::{
    data_structures::{scene_graph::ImportedMesh, texture::Texture},
    render::{DrawParams, MeshRenderer},
    viewer::Viewer,
};

/// Prints what a GPU layer would be asked to draw.
struct PrintRenderer;

impl MeshRenderer<Texture> for PrintRenderer {
    fn draw_mesh(&mut self, mesh: &ImportedMesh, params: &DrawParams, texture: Option<&Texture>) {
        let translation = params.world.w;
        println!(
            "  draw {}/{} {:<24} faces={:<6} at=({:.3}, {:.3}, {:.3}) color=({:.2}, {:.2}, {:.2}) texture={}",
            params.part,
            params.mesh,
            mesh.name(),
            mesh.face_count(),
            translation.x,
            translation.y,
            translation.z,
            params.color.x,
            params.color.y,
            params.color.z,
            texture.map_or("-", |t| t.label.as_str()),
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let model_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: model-viewer <model> [textures...]")?;
    let texture_paths: Vec<PathBuf> = args.map(PathBuf::from).collect();

    let mut viewer = Viewer::default();
    viewer.load_model(&model_path)?;
    if !texture_paths.is_empty() {
        viewer.load_textures(&texture_paths)?;
    }

    if let Some(model) = viewer.model() {
        let scene = model.scene();
        println!(
            "{}: {} parts, {} meshes, {} faces",
            scene.name(),
            scene.parts().len(),
            scene.mesh_count(),
            scene.face_count()
        );
        for (p, part) in scene.parts().iter().enumerate() {
            println!("Part {}: {}", p, part.name());
            for (m, mesh) in part.meshes().iter().enumerate() {
                println!(
                    "  Mesh {}: {} ({} vertices, {} faces)",
                    m,
                    mesh.name(),
                    mesh.vertex_count(),
                    mesh.face_count()
                );
            }
        }
    }
    for info in viewer.textures().list() {
        println!("Texture {}: {}x{}", info.name, info.width, info.height);
    }

    println!("Frame:");
    viewer.frame(0.0, &mut PrintRenderer);
    Ok(())
}
