//! Viewer data structures: the imported scene, its override tree and textures.
//!
//! - `scene_graph` holds the read-only parts and meshes delivered by the importer
//! - `overrides` is the user-editable tree aligned to the scene graph by index
//! - `transform` contains position/orientation/scale and Euler angle conversion
//! - `texture` is the registry of textures available for assignment

pub mod overrides;
pub mod scene_graph;
pub mod texture;
pub mod transform;
