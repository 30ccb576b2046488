//! # Graphics Module
//!
//! Everything that turns the demo scene into pixels.
//!
//! - **Geometry** ([`geometry`]) - Procedural meshes, no GPU involved
//! - **Scene** ([`scene`]) - Objects, transforms and lights
//! - **Resources** ([`resources`]) - Materials, textures and global uniforms
//! - **Camera** ([`camera`]) - Orbit camera and its pointer controls
//! - **Rendering** ([`rendering`]) - The wgpu render engine
//! - **UI** ([`ui`]) - imgui overlay plumbing

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
