//! Loaded textures available for assignment to meshes.
//!
//! [`TextureRegistry`] keeps textures in registration order and hands out
//! [`TextureId`]s. Ids are never reused, so an id that outlived its texture (for
//! instance one extracted from a model that has since been replaced) simply
//! resolves to nothing and the mesh falls back to flat color.

use serde::{Deserialize, Serialize};

/// Stable reference to a registered texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextureId(u64);

/// Where a texture came from; decides what survives a model swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureOrigin {
    /// Loaded on its own by the user. Survives model swaps.
    Standalone,
    /// Extracted from the currently loaded model's materials.
    Embedded,
}

/// Anything the registry can hold: it only needs a size and a name.
pub trait TextureSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Short name for lists, usually the file name.
    fn label(&self) -> &str;
}

/// A decoded RGBA image, ready for upload by the draw layer.
#[derive(Clone, Debug)]
pub struct Texture {
    pub label: String,
    pub image: image::RgbaImage,
}

impl Texture {
    pub fn from_image(label: impl Into<String>, img: &image::DynamicImage) -> Self {
        Self {
            label: label.into(),
            image: img.to_rgba8(),
        }
    }
}

impl TextureSource for Texture {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// One row of [`TextureRegistry::list`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl TextureInfo {
    /// Fits the longer side to `max_size` and keeps the aspect ratio.
    pub fn preview_size(&self, max_size: f32) -> [f32; 2] {
        if self.width == 0 || self.height == 0 {
            return [max_size, max_size];
        }
        if self.width >= self.height {
            let aspect = self.height as f32 / self.width as f32;
            [max_size, max_size * aspect]
        } else {
            let aspect = self.width as f32 / self.height as f32;
            [max_size * aspect, max_size]
        }
    }
}

struct Entry<T> {
    id: TextureId,
    origin: TextureOrigin,
    texture: T,
}

pub struct TextureRegistry<T = Texture> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: TextureSource> TextureRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register(&mut self, texture: T, origin: TextureOrigin) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "registered texture {} ({}x{}) as {:?}",
            texture.label(),
            texture.width(),
            texture.height(),
            origin
        );
        self.entries.push(Entry { id, origin, texture });
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&T> {
        // ids are handed out in increasing order and entries keep that order
        self.entries
            .binary_search_by_key(&id, |entry| entry.id)
            .ok()
            .map(|idx| &self.entries[idx].texture)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> Vec<TextureInfo> {
        self.entries
            .iter()
            .map(|entry| TextureInfo {
                id: entry.id,
                width: entry.texture.width(),
                height: entry.texture.height(),
                name: entry.texture.label().to_string(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &T)> {
        self.entries.iter().map(|entry| (entry.id, &entry.texture))
    }

    /// First texture registered under `name`, used to resolve saved assignments.
    pub fn find_by_name(&self, name: &str) -> Option<TextureId> {
        self.entries
            .iter()
            .find(|entry| entry.texture.label() == name)
            .map(|entry| entry.id)
    }

    /// Drops every texture the previous model contributed. Standalone textures stay.
    pub fn clear_embedded(&mut self) {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.origin == TextureOrigin::Standalone);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("dropped {} embedded textures", dropped);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: TextureSource> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
