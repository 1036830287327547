use std::path::Path;

use anyhow::Context;

use crate::{data_structures::texture::Texture, resources::display_name};

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Decodes the image at `path`. The texture is labelled with the file name.
pub fn load_texture(path: &Path) -> anyhow::Result<Texture> {
    let data = load_binary(path)?;
    let label = display_name(&path.to_string_lossy()).to_string();
    texture_from_bytes(&data, &label, None)
        .with_context(|| format!("failed to decode texture {}", path.display()))
}

/// Decodes in-memory image data, optionally with a mime type or extension hint.
pub fn texture_from_bytes(
    bytes: &[u8],
    label: &str,
    format: Option<&str>,
) -> anyhow::Result<Texture> {
    let img = match format.and_then(image::ImageFormat::from_extension) {
        Some(fmt) => image::load_from_memory_with_format(bytes, fmt)?,
        None => image::load_from_memory(bytes)?,
    };
    Ok(Texture::from_image(label, &img))
}

/// Loads the textures a model's materials reference, relative to the model file.
///
/// A texture that cannot be loaded is skipped with a warning: the model is still
/// usable and its meshes render with flat color.
pub fn load_material_textures(base_dir: &Path, files: &[String]) -> Vec<Texture> {
    let mut seen: Vec<&str> = Vec::new();
    let mut textures = Vec::new();
    for file in files {
        if seen.contains(&file.as_str()) {
            continue;
        }
        seen.push(file);
        // material files written on Windows keep their backslashes
        let relative = file.replace('\\', "/");
        match load_texture(&base_dir.join(relative)) {
            Ok(texture) => textures.push(texture),
            Err(e) => log::warn!("skipping material texture {}: {:#}", file, e),
        }
    }
    textures
}
