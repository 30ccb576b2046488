//! Input and resize handling
//!
//! Window-system events are translated into [`InputEvent`] by the app shell
//! and handled here against the [`AppContext`], so the rules can be tested
//! without a window.

use winit::keyboard::KeyCode;

use crate::{context::AppContext, gfx::camera::PointerEvent};

/// Input the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// New drawable size in physical pixels
    Resized { width: u32, height: u32 },
    KeyDown(KeyCode),
    Pointer(PointerEvent),
}

/// What the shell has to do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    Handled,
    /// Surface and overlay must be resized to match
    ViewportResized { width: u32, height: u32 },
    Exit,
}

pub fn handle_event(ctx: &mut AppContext, event: InputEvent) -> EventOutcome {
    match event {
        InputEvent::Resized { width, height } => {
            if width == 0 || height == 0 {
                log::debug!("Ignoring zero-sized viewport {}x{}", width, height);
                return EventOutcome::Ignored;
            }
            ctx.viewport.width = width;
            ctx.viewport.height = height;
            ctx.camera.resize_projection(width, height);
            log::debug!("Viewport resized to {}x{}", width, height);
            EventOutcome::ViewportResized { width, height }
        }
        InputEvent::KeyDown(KeyCode::KeyO) => {
            log::debug!("Key O pressed (no action bound)");
            EventOutcome::Handled
        }
        InputEvent::KeyDown(KeyCode::KeyP) => {
            log::debug!("Key P pressed (no action bound)");
            EventOutcome::Handled
        }
        InputEvent::KeyDown(KeyCode::Escape) => EventOutcome::Exit,
        InputEvent::KeyDown(_) => EventOutcome::Ignored,
        InputEvent::Pointer(pointer) => {
            if ctx.controls.process_event(pointer) {
                EventOutcome::Handled
            } else {
                EventOutcome::Ignored
            }
        }
    }
}
