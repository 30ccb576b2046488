// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles materials, textures, and the global uniform bindings.

pub mod global_bindings;
pub mod material;
pub mod texture_loader;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig};
pub use material::{Material, MaterialId, MaterialManager, Shading};
pub use texture_loader::{DecodedImage, TextureLoader};
pub use texture_resource::TextureResource;
