// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, draw ordering and frame rendering.

pub mod draw_order;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use draw_order::{sort_draws, DrawLists};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
