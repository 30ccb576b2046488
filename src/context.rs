//! State shared by the input handler and the render loop

use crate::{
    assembly::DemoScene,
    gfx::{
        camera::{CameraController, OrbitCamera},
        scene::{NodeId, Scene},
    },
    performance::PerformanceMonitor,
    render_loop::FrameState,
};

/// Drawable area in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; zero-sized viewports report 1.0
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Everything a frame reads or writes, owned in one place
pub struct AppContext {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub controls: CameraController,
    /// The object rotated every frame
    pub arrow: NodeId,
    pub frame: FrameState,
    pub stats: PerformanceMonitor,
    pub viewport: Viewport,
}

impl AppContext {
    pub fn new(demo: DemoScene, camera: OrbitCamera, viewport: Viewport) -> Self {
        Self {
            scene: demo.scene,
            camera,
            controls: CameraController::default(),
            arrow: demo.arrow,
            frame: FrameState::default(),
            stats: PerformanceMonitor::new(),
            viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_common_sizes() {
        assert_eq!(Viewport::new(800, 600).aspect(), 800.0 / 600.0);
        assert_eq!(Viewport::new(1024, 768).aspect(), 1024.0 / 768.0);
        assert_eq!(Viewport::new(0, 768).aspect(), 1.0);
    }
}
