//! # Primitive Shape Generation
//!
//! This module contains the builders for every shape in the scene.
//! All builders validate their parameters and return
//! [`SceneError::InvalidParameter`] instead of producing degenerate meshes.

use super::{GeometryData, Topology};
use crate::error::{Result, SceneError};
use std::f32::consts::PI;

fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

/// Generate a rectangular box centered at the origin
///
/// Returns the 8 shared corners and 12 triangles (two per face, counter-clockwise
/// when seen from outside). Normals point along the corner diagonals and texture
/// coordinates are projected from the XY plane, so the ±Z faces carry the whole
/// texture.
pub fn generate_box(width: f32, height: f32, depth: f32) -> Result<GeometryData> {
    require_positive("box width", width)?;
    require_positive("box height", height)?;
    require_positive("box depth", depth)?;

    let mut data = GeometryData::new(Topology::Triangles);
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // Corner i has +X when bit 0 is set, +Y for bit 1, +Z for bit 2
    for i in 0..8u32 {
        let sx = if i & 1 != 0 { 1.0 } else { -1.0 };
        let sy = if i & 2 != 0 { 1.0 } else { -1.0 };
        let sz = if i & 4 != 0 { 1.0 } else { -1.0 };

        data.vertices.push([sx * hx, sy * hy, sz * hz]);
        let inv_len = 1.0 / 3.0_f32.sqrt();
        data.normals.push([sx * inv_len, sy * inv_len, sz * inv_len]);
        data.tex_coords.push([0.5 + sx * 0.5, 0.5 - sy * 0.5]);
    }

    #[rustfmt::skip]
    let indices = vec![
        // Front (+Z)
        4, 5, 7,    7, 6, 4,
        // Back (-Z)
        1, 0, 2,    2, 3, 1,
        // Right (+X)
        5, 1, 3,    3, 7, 5,
        // Left (-X)
        0, 4, 6,    6, 2, 0,
        // Top (+Y)
        6, 7, 3,    3, 2, 6,
        // Bottom (-Y)
        0, 1, 5,    5, 4, 0,
    ];
    data.indices = indices;

    Ok(data)
}

/// Generate a closed cylinder (or truncated cone) along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius of the cap at `+height/2`
/// * `radius_bottom` - Radius of the cap at `-height/2`
/// * `height` - Extent along Y
/// * `radial_segments` - Number of segments around the axis (at least 3)
///
/// Caps with a zero radius are left out, so a cone has only one cap.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> Result<GeometryData> {
    if radial_segments < 3 {
        return Err(SceneError::invalid(format!(
            "cylinder needs at least 3 radial segments, got {}",
            radial_segments
        )));
    }
    for (name, radius) in [("top radius", radius_top), ("bottom radius", radius_bottom)] {
        if !radius.is_finite() || radius < 0.0 {
            return Err(SceneError::invalid(format!(
                "cylinder {} must be a non-negative finite number, got {}",
                name, radius
            )));
        }
    }
    if radius_top == 0.0 && radius_bottom == 0.0 {
        return Err(SceneError::invalid("cylinder radii cannot both be zero"));
    }
    require_positive("cylinder height", height)?;

    let mut data = GeometryData::new(Topology::Triangles);
    let segs = radial_segments;
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall: a top ring followed by a bottom ring, seam vertex duplicated
    for (radius, y, v) in [(radius_top, half_height, 0.0), (radius_bottom, -half_height, 1.0)] {
        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let theta = u * 2.0 * PI;
            let (sin_t, cos_t) = theta.sin_cos();

            data.vertices.push([radius * sin_t, y, radius * cos_t]);
            let len = (1.0 + slope * slope).sqrt();
            data.normals.push([sin_t / len, slope / len, cos_t / len]);
            data.tex_coords.push([u, v]);
        }
    }

    let ring_len = segs + 1;
    for i in 0..segs {
        let a = i;
        let b = ring_len + i;
        let c = ring_len + i + 1;
        let d = i + 1;

        data.indices.extend_from_slice(&[a, b, d]);
        data.indices.extend_from_slice(&[b, c, d]);
    }

    // Caps
    for (radius, y, ny) in [(radius_top, half_height, 1.0), (radius_bottom, -half_height, -1.0)] {
        if radius == 0.0 {
            continue;
        }

        let center = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, ny, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        let first = data.vertices.len() as u32;
        for i in 0..=segs {
            let theta = i as f32 / segs as f32 * 2.0 * PI;
            let (sin_t, cos_t) = theta.sin_cos();
            data.vertices.push([radius * sin_t, y, radius * cos_t]);
            data.normals.push([0.0, ny, 0.0]);
            data.tex_coords.push([sin_t * 0.5 + 0.5, cos_t * 0.5 + 0.5]);
        }

        for i in 0..segs {
            let current = first + i;
            let next = first + i + 1;
            if ny > 0.0 {
                data.indices.extend_from_slice(&[center, current, next]);
            } else {
                data.indices.extend_from_slice(&[center, next, current]);
            }
        }
    }

    Ok(data)
}

/// Dimensions of the flat arrow polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowDimensions {
    /// Shaft width `w`
    pub shaft_width: f32,
    /// Total length `l`, base to apex
    pub length: f32,
    /// Head base width `hw`, must exceed the shaft width
    pub head_width: f32,
    /// Head height `hh`
    pub head_height: f32,
}

impl ArrowDimensions {
    /// Derives an equilateral head from the shaft: `hw = 3w`, `hh = (√3/2)·hw`.
    pub fn from_shaft(shaft_width: f32, length: f32) -> Self {
        let head_width = 3.0 * shaft_width;
        Self {
            shaft_width,
            length,
            head_width,
            head_height: 3.0_f32.sqrt() / 2.0 * head_width,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("arrow shaft width", self.shaft_width)?;
        require_positive("arrow length", self.length)?;
        require_positive("arrow head height", self.head_height)?;
        if !(self.head_width.is_finite() && self.head_width > self.shaft_width) {
            return Err(SceneError::invalid(format!(
                "arrow head width {} must exceed shaft width {}",
                self.head_width, self.shaft_width
            )));
        }
        Ok(())
    }
}

/// Generate the flat arrow polygon in the local XY plane (Z = 0)
///
/// Vertex layout, with `y = l - hh` at the head base:
///
/// ```text
///            4
///          /   \
///   5 -- 6       2 -- 3
///        |       |
///        0 ----- 1
/// ```
///
/// Triangles are `{0,1,2}`, `{0,2,6}` for the shaft and `{3,4,5}` for the head.
/// The head triangle shares no vertex with the shaft.
pub fn generate_arrow(dims: ArrowDimensions) -> Result<GeometryData> {
    dims.validate()?;

    let ArrowDimensions {
        shaft_width: w,
        length: l,
        head_width: hw,
        head_height: hh,
    } = dims;
    let base = l - hh;

    let mut data = GeometryData::new(Topology::Triangles);
    data.vertices = vec![
        [-w / 2.0, 0.0, 0.0],
        [w / 2.0, 0.0, 0.0],
        [w / 2.0, base, 0.0],
        [hw / 2.0, base, 0.0],
        [0.0, l, 0.0],
        [-hw / 2.0, base, 0.0],
        [-w / 2.0, base, 0.0],
    ];
    data.normals = vec![[0.0, 0.0, 1.0]; data.vertices.len()];
    data.tex_coords = data
        .vertices
        .iter()
        .map(|v| [v[0] / hw + 0.5, 1.0 - v[1] / l])
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2,
        0, 2, 6,
        3, 4, 5,
    ];
    data.indices = indices;

    Ok(data)
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (at least 3)
/// * `latitude_segments` - Number of horizontal segments (at least 2)
pub fn generate_sphere(
    radius: f32,
    longitude_segments: u32,
    latitude_segments: u32,
) -> Result<GeometryData> {
    require_positive("sphere radius", radius)?;
    if longitude_segments < 3 || latitude_segments < 2 {
        return Err(SceneError::invalid(format!(
            "sphere needs at least 3x2 segments, got {}x{}",
            longitude_segments, latitude_segments
        )));
    }

    let mut data = GeometryData::new(Topology::Triangles);
    let long_segs = longitude_segments;
    let lat_segs = latitude_segments;

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Ok(data)
}

/// Generate a square reference grid in the XZ plane as a line list
///
/// `divisions + 1` lines run along each axis, spaced `size / divisions` apart.
pub fn generate_grid(size: f32, divisions: u32) -> Result<GeometryData> {
    require_positive("grid size", size)?;
    if divisions == 0 {
        return Err(SceneError::invalid("grid needs at least one division"));
    }

    let mut data = GeometryData::new(Topology::Lines);
    let half = size * 0.5;
    let step = size / divisions as f32;

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        for endpoints in [[[-half, 0.0, k], [half, 0.0, k]], [[k, 0.0, -half], [k, 0.0, half]]] {
            for position in endpoints {
                data.indices.push(data.vertices.len() as u32);
                data.vertices.push(position);
                data.normals.push([0.0, 1.0, 0.0]);
                data.tex_coords.push([0.0, 0.0]);
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_box_generation() {
        let wall = generate_box(3.0, 2.0, 0.5).unwrap();
        assert_eq!(wall.vertex_count(), 8);
        assert_eq!(wall.triangle_count(), 12);
        assert!(wall.validate().is_ok());

        let (min, max) = wall.bounds().unwrap();
        assert_eq!(min, [-1.5, -1.0, -0.25]);
        assert_eq!(max, [1.5, 1.0, 0.25]);
    }

    #[test]
    fn test_box_faces_point_outward() {
        let wall = generate_box(3.0, 2.0, 0.5).unwrap();
        for tri in wall.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| wall.vertices[i as usize]);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let outward = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(outward > 0.0, "triangle {:?} faces inward", tri);
        }
    }

    #[test]
    fn test_box_rejects_non_positive_dimensions() {
        for (w, h, d) in [(0.0, 1.0, 1.0), (1.0, -2.0, 1.0), (1.0, 1.0, 0.0), (f32::NAN, 1.0, 1.0)] {
            let err = generate_box(w, h, d).unwrap_err();
            assert!(err.is_invalid_parameter());
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let axis = generate_cylinder(0.0125, 0.0125, 20.0, 16).unwrap();
        assert!(axis.validate().is_ok());
        // Two side rings plus two capped rings with centers
        assert_eq!(axis.vertex_count(), 4 * 17 + 2);
        // 2 triangles per side segment, 1 per cap segment and cap
        assert_eq!(axis.triangle_count(), 16 * 2 + 16 * 2);

        let (min, max) = axis.bounds().unwrap();
        assert!((min[1] + 10.0).abs() < EPS && (max[1] - 10.0).abs() < EPS);
        assert!(max[0] <= 0.0125 + EPS && min[0] >= -0.0125 - EPS);
    }

    #[test]
    fn test_cone_skips_degenerate_cap() {
        let cone = generate_cylinder(0.0, 1.0, 2.0, 8).unwrap();
        assert!(cone.validate().is_ok());
        assert_eq!(cone.triangle_count(), 8 * 2 + 8);
    }

    #[test]
    fn test_cylinder_rejects_too_few_segments() {
        let err = generate_cylinder(1.0, 1.0, 1.0, 2).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_cylinder_rejects_bad_radii_and_height() {
        assert!(generate_cylinder(-1.0, 1.0, 1.0, 8).is_err());
        assert!(generate_cylinder(0.0, 0.0, 1.0, 8).is_err());
        assert!(generate_cylinder(1.0, 1.0, 0.0, 8).is_err());
    }

    #[test]
    fn test_arrow_matches_reference_layout() {
        let dims = ArrowDimensions::from_shaft(0.05, 1.0);
        let arrow = generate_arrow(dims).unwrap();

        assert_eq!(arrow.vertex_count(), 7);
        assert_eq!(arrow.triangle_count(), 3);
        assert_eq!(arrow.indices, vec![0, 1, 2, 0, 2, 6, 3, 4, 5]);

        let base = 1.0 - dims.head_height;
        assert_eq!(arrow.vertices[0], [-0.025, 0.0, 0.0]);
        assert_eq!(arrow.vertices[2], [0.025, base, 0.0]);
        assert_eq!(arrow.vertices[4], [0.0, 1.0, 0.0]);
        assert_eq!(arrow.vertices[5], [-dims.head_width / 2.0, base, 0.0]);
        assert!(arrow.vertices.iter().all(|v| v[2] == 0.0));
    }

    #[test]
    fn test_arrow_head_is_disjoint_from_shaft() {
        let arrow = generate_arrow(ArrowDimensions::from_shaft(0.05, 1.0)).unwrap();
        let shaft: Vec<u32> = arrow.indices[..6].to_vec();
        assert!(arrow.indices[6..].iter().all(|i| !shaft.contains(i)));
    }

    #[test]
    fn test_arrow_from_shaft_derives_equilateral_head() {
        let dims = ArrowDimensions::from_shaft(0.05, 1.0);
        assert!((dims.head_width - 0.15).abs() < EPS);
        assert!((dims.head_height - 0.15 * 3.0_f32.sqrt() / 2.0).abs() < EPS);
    }

    #[test]
    fn test_arrow_random_valid_parameters() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let w = rng.random_range(0.001..5.0f32);
            let dims = ArrowDimensions {
                shaft_width: w,
                length: rng.random_range(0.001..50.0),
                head_width: w + rng.random_range(0.001..5.0),
                head_height: rng.random_range(0.001..10.0),
            };

            let arrow = generate_arrow(dims).unwrap();
            assert_eq!(arrow.vertex_count(), 7);
            assert_eq!(arrow.triangle_count(), 3);
            assert!(arrow.indices.iter().all(|&i| i <= 6));
        }
    }

    #[test]
    fn test_arrow_rejects_invalid_parameters() {
        let valid = ArrowDimensions::from_shaft(0.05, 1.0);
        let cases = [
            ArrowDimensions { shaft_width: 0.0, ..valid },
            ArrowDimensions { shaft_width: -0.1, ..valid },
            ArrowDimensions { length: 0.0, ..valid },
            ArrowDimensions { length: -1.0, ..valid },
            ArrowDimensions { head_width: valid.shaft_width, ..valid },
            ArrowDimensions { head_width: 0.01, ..valid },
            ArrowDimensions { head_height: 0.0, ..valid },
        ];
        for dims in cases {
            let err = generate_arrow(dims).unwrap_err();
            assert!(err.is_invalid_parameter(), "{:?} accepted", dims);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.5, 8, 6).unwrap();
        assert!(sphere.validate().is_ok());
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert!(generate_sphere(1.0, 2, 6).is_err());
    }

    #[test]
    fn test_grid_generation() {
        let grid = generate_grid(200.0, 50).unwrap();
        assert!(grid.validate().is_ok());
        assert_eq!(grid.topology, Topology::Lines);
        assert_eq!(grid.primitive_count(), 51 * 2);

        let (min, max) = grid.bounds().unwrap();
        assert_eq!(min, [-100.0, 0.0, -100.0]);
        assert_eq!(max, [100.0, 0.0, 100.0]);
        assert!(generate_grid(10.0, 0).is_err());
    }
}
