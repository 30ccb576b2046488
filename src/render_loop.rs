//! Per-frame update and draw orchestration
//!
//! [`FrameState::advance`] is the pure part of a frame: it only depends on
//! the previous state. [`tick`] applies it to the scene and drives the
//! camera controls, the rasterizer and the stats, in that order.

use std::f64::consts::TAU;

use crate::{
    context::AppContext,
    error::Result,
    gfx::{camera::OrbitCamera, scene::Scene},
};

/// Rotation added to the arrow every frame, in radians
pub const ARROW_ROTATION_STEP: f64 = 0.01;

/// Anything that can draw the scene from a camera
pub trait Rasterizer {
    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> Result<()>;
}

/// Animation state carried from one frame to the next
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Frames advanced so far
    pub frame: u64,
    /// Wall time accumulated over those frames, in seconds
    pub elapsed: f64,
    /// Arrow rotation around its local Z axis, in radians, kept in `[0, TAU)`
    pub arrow_rotation: f64,
}

impl FrameState {
    /// The state one frame later. The arrow turns by a fixed step per frame
    /// regardless of `dt`.
    pub fn advance(self, dt: f32) -> FrameState {
        FrameState {
            frame: self.frame + 1,
            elapsed: self.elapsed + f64::from(dt),
            arrow_rotation: (self.arrow_rotation + ARROW_ROTATION_STEP).rem_euclid(TAU),
        }
    }
}

/// Runs one frame: animate, apply camera input, draw, count the frame.
pub fn tick<R: Rasterizer + ?Sized>(ctx: &mut AppContext, rasterizer: &mut R, dt: f32) -> Result<()> {
    ctx.frame = ctx.frame.advance(dt);
    if let Some(arrow) = ctx.scene.object_mut(ctx.arrow) {
        arrow.transform.rotation.z = ctx.frame.arrow_rotation as f32;
    }

    ctx.controls.update(&mut ctx.camera);
    ctx.camera.update_view_proj();

    rasterizer.render(&ctx.scene, &ctx.camera)?;

    ctx.stats.update();
    Ok(())
}
