//! Global uniform bindings for camera and scene lighting
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every object in the scene: camera matrices, the point light and the
//! summed ambient light.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::light::PointLight},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix

    point_light_position: [f32; 4], // w: 1.0 when a point light exists
    point_light_color: [f32; 4],    // rgb color, w intensity
    ambient: [f32; 4],              // rgb radiance, w unused
}
// Total: 16 + 64 + 16 + 16 + 16 = 128 bytes

/// Lights as the shader sees them
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LightConfig {
    pub point: Option<PointLight>,
    pub ambient: [f32; 3],
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: LightConfig) -> Self {
        let (point_light_position, point_light_color) = match lights.point {
            Some(light) => (
                [light.position.x, light.position.y, light.position.z, 1.0],
                [light.color[0], light.color[1], light.color[2], light.intensity],
            ),
            None => ([0.0; 4], [0.0; 4]),
        };
        let [ar, ag, ab] = lights.ambient;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            point_light_position,
            point_light_color,
            ambient: [ar, ag, ab, 0.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called once per frame before the scene pass.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: LightConfig,
) {
    ubo.write(queue, &GlobalUBOContent::new(camera, lights));
}

/// Manages bind group layouts and bind groups for global uniforms
///
/// This is bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the layout and the bind group for `ubo`
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .uniform(wgpu::ShaderStages::VERTEX_FRAGMENT)
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.as_binding())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn content_size_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);
    }

    #[test]
    fn point_light_packs_intensity_into_color_w() {
        let lights = LightConfig {
            point: Some(PointLight::new([1.0, 0.0, 0.0], 500.0, Vector3::new(5.0, 5.0, 5.0))),
            ambient: [0.25, 0.25, 0.25],
        };
        let content = GlobalUBOContent::new(CameraUniform::default(), lights);
        assert_eq!(content.point_light_position, [5.0, 5.0, 5.0, 1.0]);
        assert_eq!(content.point_light_color, [1.0, 0.0, 0.0, 500.0]);
        assert_eq!(content.ambient, [0.25, 0.25, 0.25, 0.0]);
    }

    #[test]
    fn missing_point_light_is_flagged_off() {
        let content = GlobalUBOContent::new(CameraUniform::default(), LightConfig::default());
        assert_eq!(content.point_light_position[3], 0.0);
    }
}
