use std::path::Path;

use wgpu::Device;

use super::{
    light::{AmbientLight, PointLight},
    object::Object,
};
use crate::{
    gfx::resources::{
        global_bindings::LightConfig,
        material::{Material, MaterialManager},
        texture_resource::TextureResource,
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

/// Handle to a node, valid for the lifetime of the scene it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Anything that can be registered in a [`Scene`]
pub enum SceneNode {
    Object(Object),
    PointLight(PointLight),
    AmbientLight(AmbientLight),
}

impl From<Object> for SceneNode {
    fn from(object: Object) -> Self {
        SceneNode::Object(object)
    }
}

impl From<PointLight> for SceneNode {
    fn from(light: PointLight) -> Self {
        SceneNode::PointLight(light)
    }
}

impl From<AmbientLight> for SceneNode {
    fn from(light: AmbientLight) -> Self {
        SceneNode::AmbientLight(light)
    }
}

/// Flat, insertion-ordered collection of objects and lights plus the
/// materials they use
pub struct Scene {
    nodes: Vec<SceneNode>,
    pub material_manager: MaterialManager,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Registers a node and returns its handle
    pub fn add(&mut self, node: impl Into<SceneNode>) -> NodeId {
        self.nodes.push(node.into());
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a material, replacing one with the same name
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn object(&self, id: NodeId) -> Option<&Object> {
        match self.nodes.get(id.0)? {
            SceneNode::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: NodeId) -> Option<&mut Object> {
        match self.nodes.get_mut(id.0)? {
            SceneNode::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Object(object) => Some(object),
            _ => None,
        })
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.nodes.iter_mut().filter_map(|node| match node {
            SceneNode::Object(object) => Some(object),
            _ => None,
        })
    }

    pub fn point_lights(&self) -> impl Iterator<Item = &PointLight> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::PointLight(light) => Some(light),
            _ => None,
        })
    }

    /// Lighting for the shader: the first point light and the sum of all
    /// ambient lights
    pub fn lighting(&self) -> LightConfig {
        let ambient = self
            .nodes
            .iter()
            .filter_map(|node| match node {
                SceneNode::AmbientLight(light) => Some(light.radiance()),
                _ => None,
            })
            .fold([0.0; 3], |acc, r| [acc[0] + r[0], acc[1] + r[1], acc[2] + r[2]]);

        LightConfig {
            point: self.point_lights().next().copied(),
            ambient,
        }
    }

    /// Gets material for rendering an object
    ///
    /// Returns the default material if the object's material doesn't exist.
    pub fn material_for(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(&object.material_id)
    }

    /// Initializes GPU resources for all objects and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    /// Materials bind `fallback` until their texture arrives.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transform_layout: &wgpu::BindGroupLayout,
        material_layout: &BindGroupLayoutWithDesc,
        fallback: &TextureResource,
    ) {
        let Self {
            nodes,
            material_manager,
        } = self;

        for node in nodes.iter_mut() {
            if let SceneNode::Object(object) = node {
                let wireframe = material_manager
                    .get_material_for_object(&object.material_id)
                    .wireframe;
                object.init_gpu_resources(device, transform_layout, wireframe);
            }
        }

        for material in material_manager.iter_mut() {
            material.update_gpu_resources(device, queue, material_layout, None, fallback);
        }
    }

    /// Binds a freshly loaded texture to every material that references it.
    ///
    /// Returns how many materials were rebound.
    pub fn bind_texture(
        &mut self,
        path: &Path,
        device: &Device,
        queue: &wgpu::Queue,
        material_layout: &BindGroupLayoutWithDesc,
        texture: &TextureResource,
    ) -> usize {
        let mut count = 0;
        for material in self.material_manager.using_texture_mut(path) {
            material.update_gpu_resources(device, queue, material_layout, Some(texture), texture);
            count += 1;
        }
        count
    }

    /// Writes every object transform to the GPU
    pub fn sync_transforms(&self, queue: &wgpu::Queue) {
        for object in self.objects() {
            object.sync_transform(queue);
        }
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics::default();
        for node in &self.nodes {
            match node {
                SceneNode::Object(object) => {
                    let geometry = object.mesh.geometry();
                    stats.object_count += 1;
                    stats.total_vertices += geometry.vertex_count();
                    stats.total_triangles += geometry.triangle_count();
                }
                SceneNode::PointLight(_) | SceneNode::AmbientLight(_) => stats.light_count += 1,
            }
        }
        stats
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for debugging and logging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_box,
        scene::object::Mesh,
    };
    use cgmath::Vector3;

    fn wall(name: &str) -> Object {
        Object::new(name, Mesh::new(generate_box(3.0, 2.0, 0.5).unwrap()).unwrap(), "wall")
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let mut scene = Scene::new();
        let light = scene.add(PointLight::new([1.0, 0.0, 0.0], 500.0, Vector3::new(5.0, 5.0, 5.0)));
        let first = scene.add(wall("wall 1"));
        let second = scene.add(wall("wall 2"));

        assert_eq!(light.index(), 0);
        assert_eq!((first.index(), second.index()), (1, 2));
        let names: Vec<&str> = scene.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["wall 1", "wall 2"]);
        assert!(scene.object(light).is_none());
    }

    #[test]
    fn walls_from_same_parameters_are_independent() {
        let mut scene = Scene::new();
        let first = scene.add(wall("wall 1"));
        let second = scene.add(wall("wall 2"));

        scene.object_mut(first).unwrap().transform.position.z = 10.25;

        assert_eq!(scene.object(first).unwrap().transform.position.z, 10.25);
        assert_eq!(scene.object(second).unwrap().transform.position.z, 0.0);
    }

    #[test]
    fn lighting_sums_ambient_and_takes_first_point_light() {
        let mut scene = Scene::new();
        scene.add(AmbientLight::new([1.0, 1.0, 1.0], 0.25));
        scene.add(AmbientLight::new([1.0, 0.0, 0.0], 0.5));
        let red = PointLight::new([1.0, 0.0, 0.0], 500.0, Vector3::new(5.0, 5.0, 5.0));
        scene.add(red);
        scene.add(PointLight::new([0.0, 1.0, 0.0], 1.0, Vector3::new(0.0, 0.0, 0.0)));

        let lighting = scene.lighting();
        assert_eq!(lighting.ambient, [0.75, 0.25, 0.25]);
        assert_eq!(lighting.point, Some(red));
    }

    #[test]
    fn statistics_count_objects_and_lights() {
        let mut scene = Scene::new();
        scene.add(AmbientLight::new([1.0, 1.0, 1.0], 0.25));
        scene.add(wall("wall 1"));
        scene.add(wall("wall 2"));

        let stats = scene.statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.total_vertices, 16);
        assert_eq!(stats.total_triangles, 24);
    }

    #[test]
    fn missing_material_resolves_to_default() {
        let scene = Scene::new();
        let object = wall("wall");
        assert_eq!(scene.material_for(&object).name, "default");
    }
}
