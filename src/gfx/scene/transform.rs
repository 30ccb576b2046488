use cgmath::{Matrix4, Rad, Vector3, Zero};

/// Position, rotation and scale of a scene object.
///
/// Rotation is stored as Euler angles in radians and applied X, then Y, then Z
/// in the object's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Moves the object along its local Z axis.
    pub fn translate_z(&mut self, distance: f32) {
        let local = self.rotation_matrix() * Vector3::unit_z().extend(0.0);
        self.position += local.truncate() * distance;
    }

    fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    /// Model matrix `T * R * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, SquareMatrix, Vector4};

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn translate_z_without_rotation_moves_along_world_z() {
        let mut t = Transform::default();
        t.translate_z(10.25);
        assert_eq!(t.position, Vector3::new(0.0, 0.0, 10.25));
    }

    #[test]
    fn quarter_turn_about_x_lays_y_axis_along_z() {
        let t = Transform {
            rotation: Vector3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };
        let up = t.matrix() * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((up.truncate() - Vector3::unit_z()).magnitude() < 1e-6);
    }

    #[test]
    fn matrix_applies_scale_before_translation() {
        let t = Transform {
            position: Vector3::new(1.0, 0.0, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Transform::default()
        };
        let p = t.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vector4::new(3.0, 0.0, 0.0, 1.0));
    }
}
