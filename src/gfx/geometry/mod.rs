//! # Procedural Geometry Generation
//!
//! This module builds the vertex and index buffers for every shape in the demo
//! scene, so no model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: 8-corner rectangular prism
//! - **Cylinder**: closed tube with independent top and bottom radii
//! - **Arrow**: flat 7-vertex arrow polygon in the XY plane
//! - **Sphere**: UV sphere (used for the light marker)
//! - **Grid**: line-list reference grid in the XZ plane
//!
//! ## Usage
//!
//! ```rust
//! use tinyscene::gfx::geometry::{generate_arrow, generate_box, ArrowDimensions};
//!
//! let wall = generate_box(3.0, 2.0, 0.5).unwrap();
//! assert_eq!(wall.triangle_count(), 12);
//!
//! let arrow = generate_arrow(ArrowDimensions::from_shaft(0.05, 1.0)).unwrap();
//! assert_eq!(arrow.vertex_count(), 7);
//! ```

pub mod primitives;

pub use primitives::*;

use std::collections::HashSet;

use crate::error::{Result, SceneError};
use crate::gfx::scene::vertex::Vertex3D;

/// How the index buffer groups vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Index triplets, one triangle each
    Triangles,
    /// Index pairs, one line segment each
    Lines,
}

impl Topology {
    /// Number of indices that make up one primitive
    pub fn indices_per_primitive(self) -> usize {
        match self {
            Topology::Triangles => 3,
            Topology::Lines => 2,
        }
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z) in the mesh's local frame
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Primitive indices (counter-clockwise winding for triangles)
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new(topology: Topology) -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry (zero for line lists)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Get the number of primitives (triangles or line segments)
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when there are no vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        });
        Some(bounds)
    }

    /// Checks the buffer invariants: attribute arrays match the vertex count,
    /// the index count is a whole number of primitives and every index names
    /// an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        if self.normals.len() != count || self.tex_coords.len() != count {
            return Err(SceneError::invalid(format!(
                "attribute length mismatch: {} positions, {} normals, {} uvs",
                count,
                self.normals.len(),
                self.tex_coords.len()
            )));
        }

        let stride = self.topology.indices_per_primitive();
        if self.indices.len() % stride != 0 {
            return Err(SceneError::invalid(format!(
                "index count {} is not a multiple of {}",
                self.indices.len(),
                stride
            )));
        }

        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(SceneError::invalid(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }

        Ok(())
    }

    /// Converts a triangle list into the deduplicated line list of its edges.
    ///
    /// Line geometry is returned unchanged.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        if self.topology == Topology::Lines {
            return self.indices.clone();
        }

        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new(Topology::Triangles)
    }
}
