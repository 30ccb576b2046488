//! Light sources placed in the scene.

use cgmath::Vector3;

/// Converts a `0xRRGGBB` value into RGB components in `[0, 1]`.
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Omnidirectional light with inverse-square falloff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl PointLight {
    pub fn new(color: [f32; 3], intensity: f32, position: Vector3<f32>) -> Self {
        Self {
            color,
            intensity,
            position,
        }
    }
}

/// Uniform light applied to every lit surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: [f32; 3], intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// Color scaled by intensity
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}
