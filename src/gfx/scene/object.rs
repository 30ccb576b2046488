use wgpu::{util::DeviceExt, Device};

use super::{transform::Transform, vertex::Vertex3D};
use crate::{
    error::Result,
    gfx::{
        geometry::{GeometryData, Topology},
        resources::material::MaterialId,
    },
};

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    topology: Topology,
}

/// Validated geometry plus the GPU buffers uploaded from it
pub struct Mesh {
    geometry: GeometryData,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    /// Wraps geometry after checking its index invariants.
    pub fn new(geometry: GeometryData) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            buffers: None,
        })
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    /// Topology the mesh is drawn with once uploaded
    pub fn draw_topology(&self) -> Option<Topology> {
        self.buffers.as_ref().map(|b| b.topology)
    }

    /// Indices and topology `draw_mesh` issues. A wireframe mesh is drawn
    /// from the edge list of its triangles.
    pub fn draw_indices(&self, wireframe: bool) -> (Vec<u32>, Topology) {
        if wireframe {
            (self.geometry.wireframe_indices(), Topology::Lines)
        } else {
            (self.geometry.indices.clone(), self.geometry.topology)
        }
    }

    /// Uploads vertex and index buffers
    pub fn upload(&mut self, device: &Device, wireframe: bool) {
        let vertices = self.geometry.to_vertices();
        let (indices, topology) = self.draw_indices(wireframe);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice::<Vertex3D, u8>(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            topology,
        });
    }
}

// GPU resources struct to hold the per-object transform uniform
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// A mesh instance placed in the scene
pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Transform,
    pub material_id: MaterialId,
    pub visible: bool,
    gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(name: &str, mesh: Mesh, material_id: &str) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform: Transform::default(),
            material_id: material_id.to_string(),
            visible: true,
            gpu_resources: None,
        }
    }

    /// Builder pattern: Set the initial transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Creates mesh buffers and the transform uniform
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        transform_layout: &wgpu::BindGroupLayout,
        wireframe: bool,
    ) {
        self.mesh.upload(device, wireframe);

        // cgmath matrices are already column-major for GPU
        let matrix = self.transform.matrix();
        let transform_data: &[f32; 16] = matrix.as_ref();

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform", self.name)),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Transform Bind Group", self.name)),
            layout: transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Writes the current transform to the GPU if resources exist
    pub fn sync_transform(&self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            let matrix = self.transform.matrix();
            let transform_data: &[f32; 16] = matrix.as_ref();
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::cast_slice(transform_data),
            );
        }
    }

    /// Get the transform bind group for rendering
    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

pub trait DrawObject {
    fn draw_mesh(&mut self, mesh: &Mesh);
    /// Binds the object's transform at `transform_group` and draws its mesh
    fn draw_object(&mut self, object: &Object, transform_group: u32);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let Some(buffers) = &mesh.buffers else {
            return; // Not uploaded yet
        };

        self.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..buffers.index_count, 0, 0..1);
    }

    fn draw_object(&mut self, object: &Object, transform_group: u32) {
        let Some(bind_group) = object.transform_bind_group() else {
            return;
        };
        self.set_bind_group(transform_group, bind_group, &[]);
        self.draw_mesh(&object.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_box, generate_grid};
    use cgmath::Vector3;

    #[test]
    fn mesh_rejects_invalid_geometry() {
        let mut geometry = generate_box(1.0, 1.0, 1.0).unwrap();
        geometry.indices.push(42);
        assert!(Mesh::new(geometry).is_err());
    }

    #[test]
    fn objects_from_same_geometry_have_independent_transforms() {
        let geometry = generate_box(3.0, 2.0, 0.5).unwrap();
        let mut first = Object::new("a", Mesh::new(geometry.clone()).unwrap(), "m");
        let second = Object::new("b", Mesh::new(geometry).unwrap(), "m");

        first.transform.position = Vector3::new(0.0, 0.0, 10.25);
        first.transform.rotation.y = 1.0;

        assert_eq!(second.transform, Transform::default());
        assert_eq!(first.mesh.geometry(), second.mesh.geometry());
    }

    #[test]
    fn solid_box_draws_every_triangle_once() {
        let mesh = Mesh::new(generate_box(3.0, 2.0, 0.5).unwrap()).unwrap();
        let (indices, topology) = mesh.draw_indices(false);
        assert_eq!(topology, Topology::Triangles);
        assert_eq!(indices, mesh.geometry().indices);
    }

    #[test]
    fn wireframe_draws_each_edge_as_one_line() {
        let mesh = Mesh::new(generate_box(1.0, 1.0, 1.0).unwrap()).unwrap();
        let (indices, topology) = mesh.draw_indices(true);
        assert_eq!(topology, Topology::Lines);
        // 12 box edges plus one diagonal per face
        assert_eq!(indices.len(), 18 * 2);

        let grid = Mesh::new(generate_grid(10.0, 2).unwrap()).unwrap();
        assert_eq!(grid.draw_indices(false).1, Topology::Lines);
        assert_eq!(grid.draw_indices(true).0, grid.geometry().indices);
    }

    #[test]
    fn new_object_has_no_gpu_resources() {
        let mesh = Mesh::new(generate_box(1.0, 1.0, 1.0).unwrap()).unwrap();
        let object = Object::new("box", mesh, "default");
        assert!(!object.has_gpu_resources());
        assert!(object.mesh.draw_topology().is_none());
        assert!(object.visible);
    }
}
