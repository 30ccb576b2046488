use super::camera_utils::{Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view
    pub fovy: Deg<f32>,
    /// Viewport width over height
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Perspective camera orbiting a target point (Y up)
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub projection: Projection,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        self.projection.matrix() * view
    }
}

impl OrbitCamera {
    pub fn new(
        distance: f32,
        pitch: f32,
        yaw: f32,
        target: Vector3<f32>,
        projection: Projection,
    ) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            projection,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Places the camera at `eye`, orbiting `target`.
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, projection: Projection) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude();
        let (pitch, yaw) = if distance > 0.0 {
            ((offset.y / distance).clamp(-1.0, 1.0).asin(), offset.x.atan2(offset.z))
        } else {
            (0.0, 0.0)
        };
        Self::new(distance, pitch, yaw, target, projection)
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Zoom by a scroll amount; scales with distance so zooming feels even
    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = self.distance * 0.1 * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = (right * delta.0 + up * delta.1) * pan_scale;

        // Move both eye and target to maintain the view direction
        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// Recomputes the aspect ratio for a new viewport size.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.projection.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection {
            fovy: Deg(50.0),
            aspect: 800.0 / 600.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    #[test]
    fn looking_at_reproduces_eye_position() {
        let eye = Vector3::new(-3.0, 0.0, 30.0);
        let camera = OrbitCamera::looking_at(eye, Vector3::zero(), projection());
        assert!((camera.eye - eye).magnitude() < 1e-4);
        assert!((camera.distance - 909.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn resize_changes_only_aspect() {
        let mut camera =
            OrbitCamera::looking_at(Vector3::new(-3.0, 0.0, 30.0), Vector3::zero(), projection());
        let before = camera;

        camera.resize_projection(1024, 768);

        assert_eq!(camera.projection.aspect, 1024.0 / 768.0);
        assert_eq!(camera.projection.fovy, before.projection.fovy);
        assert_eq!(camera.projection.znear, before.projection.znear);
        assert_eq!(camera.projection.zfar, before.projection.zfar);
        assert_eq!(camera.eye, before.eye);
        assert_eq!(camera.target, before.target);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), projection());
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        assert!(camera.eye.y < 10.0);
    }

    #[test]
    fn zoom_respects_distance_bounds() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), projection());
        camera.bounds.max_distance = Some(12.0);
        camera.add_distance(100.0);
        assert_eq!(camera.distance, 12.0);
    }

    #[test]
    fn pan_moves_eye_and_target_together() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), projection());
        let offset = camera.eye - camera.target;
        camera.pan((1.0, 0.5));
        assert!((camera.eye - camera.target - offset).magnitude() < 1e-5);
        assert!(camera.target.magnitude() > 0.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let mut camera =
            OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 30.0), Vector3::zero(), projection());
        camera.update_view_proj();
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
        assert_eq!(camera.uniform.view_position, [0.0, 0.0, 30.0, 1.0]);
    }
}
