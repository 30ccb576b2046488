//! # Scene Management Module
//!
//! This module holds the flat scene model: objects (a mesh, a transform and a
//! material reference), lights, and the insertion-ordered [`Scene`] that owns
//! them all.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns every node and the material registry
//! - [`Object`] - A mesh instance with its own [`Transform`]
//! - [`PointLight`] / [`AmbientLight`] - Light sources
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ## Usage
//!
//! ```rust
//! use tinyscene::gfx::geometry::generate_box;
//! use tinyscene::gfx::scene::{Mesh, Object, Scene};
//!
//! let mut scene = Scene::new();
//! let mesh = Mesh::new(generate_box(1.0, 1.0, 1.0).unwrap()).unwrap();
//! let id = scene.add(Object::new("crate", mesh, "default"));
//! scene.object_mut(id).unwrap().transform.position.y = 2.0;
//! ```

pub mod light;
pub mod object;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use light::{rgb_from_hex, AmbientLight, PointLight};
pub use object::{DrawObject, Mesh, Object};
pub use scene::{NodeId, Scene, SceneNode, SceneStatistics};
pub use transform::Transform;
pub use vertex::Vertex3D;
