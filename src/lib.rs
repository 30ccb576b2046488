//! tinyscene
//!
//! Two translucent textured walls, a spinning arrow and a Z axis, viewed
//! through an orbit camera. Built on wgpu and winit.
//!
//! The scene core ([`assembly`], [`gfx::geometry`], [`render_loop`],
//! [`input`]) runs without a window; [`app`] wires it to one.

pub mod app;
pub mod assembly;
pub mod cli;
pub mod context;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod render_loop;
pub mod wgpu_utils;

pub use app::{run, AppConfig};
pub use assembly::{build_camera, build_scene, DemoScene, SceneConfig};
pub use error::{Result, SceneError};
