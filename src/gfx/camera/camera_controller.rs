use super::orbit_camera::OrbitCamera;

/// Mouse buttons the orbit controls react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Windowing-independent pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Button { button: PointerButton, pressed: bool },
    /// Raw motion in pixels since the previous event
    Moved { dx: f32, dy: f32 },
    /// Scroll in lines; positive zooms out
    Wheel { delta: f32 },
    Modifiers { shift: bool },
}

/// Orbit controls: drag to rotate, shift-drag or right-drag to pan, wheel
/// to zoom.
///
/// Input is buffered by [`CameraController::process_event`] and applied to
/// the camera once per frame in [`CameraController::update`].
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_primary_pressed: bool,
    is_secondary_pressed: bool,
    is_shift_held: bool,
    pending_rotate: (f32, f32),
    pending_pan: (f32, f32),
    pending_zoom: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_primary_pressed: false,
            is_secondary_pressed: false,
            is_shift_held: false,
            pending_rotate: (0.0, 0.0),
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,
        }
    }

    /// Records pointer input. Returns true if the event concerns the controls.
    pub fn process_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Button { button, pressed } => match button {
                PointerButton::Primary => {
                    self.is_primary_pressed = pressed;
                    true
                }
                PointerButton::Secondary => {
                    self.is_secondary_pressed = pressed;
                    true
                }
                PointerButton::Middle => false,
            },
            PointerEvent::Modifiers { shift } => {
                if shift != self.is_shift_held {
                    log::trace!("Shift state changed: {}", shift);
                }
                self.is_shift_held = shift;
                true
            }
            PointerEvent::Wheel { delta } => {
                self.pending_zoom += delta;
                true
            }
            PointerEvent::Moved { dx, dy } => {
                if self.is_panning() {
                    self.pending_pan.0 += dx;
                    self.pending_pan.1 += dy;
                    true
                } else if self.is_rotating() {
                    self.pending_rotate.0 += dx;
                    self.pending_rotate.1 += dy;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Applies buffered input to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        let mut changed = false;

        let (dx, dy) = std::mem::take(&mut self.pending_rotate);
        if dx != 0.0 || dy != 0.0 {
            camera.add_yaw(-dx * self.rotate_speed);
            camera.add_pitch(dy * self.rotate_speed);
            changed = true;
        }

        let (px, py) = std::mem::take(&mut self.pending_pan);
        if px != 0.0 || py != 0.0 {
            camera.pan((-px * self.pan_speed, py * self.pan_speed));
            changed = true;
        }

        let zoom = std::mem::take(&mut self.pending_zoom);
        if zoom != 0.0 {
            camera.add_distance(zoom * self.zoom_speed);
            changed = true;
        }

        changed
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        (self.is_primary_pressed && self.is_shift_held) || self.is_secondary_pressed
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_primary_pressed && !self.is_shift_held
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::Projection;
    use cgmath::{Deg, InnerSpace, Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::looking_at(
            Vector3::new(-3.0, 0.0, 30.0),
            Vector3::zero(),
            Projection {
                fovy: Deg(50.0),
                aspect: 1.5,
                znear: 0.1,
                zfar: 1000.0,
            },
        )
    }

    fn press(controller: &mut CameraController, button: PointerButton) {
        controller.process_event(PointerEvent::Button {
            button,
            pressed: true,
        });
    }

    #[test]
    fn update_without_input_leaves_camera_alone() {
        let mut camera = camera();
        let before = camera.eye;
        let mut controller = CameraController::default();

        assert!(!controller.update(&mut camera));
        assert_eq!(camera.eye, before);
    }

    #[test]
    fn motion_without_button_is_ignored() {
        let mut controller = CameraController::default();
        assert!(!controller.process_event(PointerEvent::Moved { dx: 5.0, dy: 5.0 }));
        assert!(!controller.update(&mut camera()));
    }

    #[test]
    fn drag_rotates_around_target() {
        let mut camera = camera();
        let distance = camera.distance;
        let yaw = camera.yaw;
        let mut controller = CameraController::default();

        press(&mut controller, PointerButton::Primary);
        controller.process_event(PointerEvent::Moved { dx: 40.0, dy: 0.0 });
        assert!(controller.update(&mut camera));

        assert!((camera.yaw - (yaw - 40.0 * controller.rotate_speed)).abs() < 1e-5);
        assert!((camera.eye.magnitude() - distance).abs() < 1e-3);
        // Buffered input is consumed
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn shift_drag_pans_target() {
        let mut camera = camera();
        let mut controller = CameraController::default();

        controller.process_event(PointerEvent::Modifiers { shift: true });
        press(&mut controller, PointerButton::Primary);
        assert!(controller.is_panning());
        controller.process_event(PointerEvent::Moved { dx: 10.0, dy: 0.0 });
        controller.update(&mut camera);

        assert!(camera.target.magnitude() > 0.0);
    }

    #[test]
    fn wheel_zooms_out_on_positive_delta() {
        let mut camera = camera();
        let distance = camera.distance;
        let mut controller = CameraController::default();

        controller.process_event(PointerEvent::Wheel { delta: 1.0 });
        controller.update(&mut camera);

        assert!(camera.distance > distance);
    }
}
