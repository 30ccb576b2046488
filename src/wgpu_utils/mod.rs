//! Small wgpu helpers shared by the render engine and the GPU-side resources

pub mod binding_builder;
pub mod uniform_buffer;

pub use binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};
pub use uniform_buffer::UniformBuffer;
