//! model-viewer
//!
//! Core of an interactive 3D model viewer. A model is imported through `tobj` or
//! `gltf` into a read-only scene graph; next to it lives an override tree the user
//! edits through the GUI. Each frame the two are resolved into per-mesh draw
//! parameters for the GPU layer.
//!
//! High-level modules
//! - `config`: viewer settings and saved override configurations
//! - `data_structures`: imported scene graph, override tree, transforms, textures
//! - `editor`: edit operations called by the GUI with explicit part/mesh indices
//! - `render`: per-frame resolution into draw parameters
//! - `resources`: model and texture import
//! - `viewer`: the session tying it all together
//!

pub mod config;
pub mod data_structures;
pub mod editor;
pub mod render;
pub mod resources;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
