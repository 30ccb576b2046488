//! Material system
//!
//! Provides basic (unlit by default) material definitions and centralized
//! management with GPU resource handling. Materials are stored in
//! [`MaterialManager`] and objects reference them by ID, so several objects
//! can share one material description.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wgpu::Device;

use super::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Name of the material every manager starts with
pub const DEFAULT_MATERIAL: &str = "default";

/// Whether scene lights affect a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Flat color (and texture), lights ignored
    #[default]
    Unlit,
    /// Ambient plus point-light diffuse
    Lit,
}

/// GPU uniform data for materials
///
/// MUST match the `Material` struct in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// RGB color and effective alpha
    pub color: [f32; 4],
    /// x: 1.0 when lit, y: 1.0 when a texture is bound
    pub params: [f32; 4],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the layout shared by every material bind group:
/// uniform, color texture, filtering sampler.
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .uniform(wgpu::ShaderStages::FRAGMENT)
        .texture_2d(wgpu::ShaderStages::FRAGMENT)
        .filtering_sampler(wgpu::ShaderStages::FRAGMENT)
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    texture_bound: bool,
}

/// Surface description shared by one or more objects
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    /// Texture file multiplied with the color once it has loaded
    pub texture: Option<PathBuf>,
    /// Only used when `transparent` is set
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub shading: Shading,

    // GPU resources - shared by all objects using this material
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self::basic(DEFAULT_MATERIAL, [0.8, 0.8, 0.8])
    }
}

impl Material {
    /// Creates an opaque, unlit, untextured material
    pub fn basic(name: &str, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
            texture: None,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            shading: Shading::Unlit,
            gpu: None,
        }
    }

    /// Builder pattern: Set the color texture path
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Builder pattern: Set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Enable alpha blending
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Builder pattern: Draw edges only
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Builder pattern: Set shading model
    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Opacity is ignored unless the material is transparent
    pub fn effective_alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }

    /// Whether the material is drawn in the blended pass
    pub fn is_blended(&self) -> bool {
        self.transparent && !self.wireframe
    }

    pub fn uniform(&self, texture_bound: bool) -> MaterialUniform {
        let [r, g, b] = self.color;
        MaterialUniform {
            color: [r, g, b, self.effective_alpha()],
            params: [
                if self.shading == Shading::Lit { 1.0 } else { 0.0 },
                if texture_bound { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }

    /// Creates or rebinds GPU resources for this material.
    ///
    /// `texture` is the loaded color texture, or `None` to bind the fallback
    /// and leave the material untextured.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        texture: Option<&TextureResource>,
        fallback: &TextureResource,
    ) {
        let texture_bound = texture.is_some();
        let bound = texture.unwrap_or(fallback);

        let uniform = self.uniform(texture_bound);
        let ubo = match self.gpu.take() {
            Some(mut gpu) => {
                gpu.ubo.write(queue, &uniform);
                gpu.ubo
            }
            None => MaterialUBO::new(device, &uniform),
        };

        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.as_binding())
            .texture(&bound.view)
            .sampler(&bound.sampler)
            .create(device, &format!("{} Material Bind Group", self.name));

        self.gpu = Some(MaterialGpu {
            ubo,
            bind_group,
            texture_bound,
        });
    }

    /// Gets the bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    /// True once the material's texture is on the GPU
    pub fn is_texture_bound(&self) -> bool {
        self.gpu.as_ref().is_some_and(|gpu| gpu.texture_bound)
    }
}

/// Manages all materials in the scene
///
/// Objects reference materials by ID rather than storing material data
/// directly, so objects sharing a material share its GPU resources.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        if material.name == DEFAULT_MATERIAL {
            self.default_material = material;
        } else {
            self.materials.insert(material.name.clone(), material);
        }
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&self.default_material);
        }
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&mut self.default_material);
        }
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.default_material
    }

    /// Gets material for an object with fallback to default
    pub fn get_material_for_object(&self, material_id: &str) -> &Material {
        self.get_material(material_id)
            .unwrap_or(&self.default_material)
    }

    /// Lists all material IDs, default included
    pub fn list_materials(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.push(DEFAULT_MATERIAL);
        names.sort_unstable();
        names
    }

    /// Every distinct texture path referenced by a material
    pub fn texture_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .iter()
            .filter_map(|m| m.texture.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        std::iter::once(&self.default_material).chain(self.materials.values())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        std::iter::once(&mut self.default_material).chain(self.materials.values_mut())
    }

    /// Materials whose texture is the given file
    pub fn using_texture_mut<'a>(
        &'a mut self,
        path: &'a Path,
    ) -> impl Iterator<Item = &'a mut Material> + 'a {
        self.iter_mut()
            .filter(move |m| m.texture.as_deref() == Some(path))
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}
