//! Error types shared across the crate.

use thiserror::Error;

/// Everything that can go wrong while building or running the demo scene.
///
/// Only [`SceneError::InvalidParameter`] can come out of the scene core
/// (geometry and assembly). The remaining variants belong to the window and
/// GPU shell and are fatal once they surface.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface error while rendering: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to decode texture '{path}': {source}")]
    TextureDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl SceneError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SceneError::InvalidParameter(message.into())
    }

    /// True for the geometry/assembly error kind.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, SceneError::InvalidParameter(_))
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
