//! Builds the fixed demo scene and its camera

use std::path::PathBuf;

use cgmath::{Deg, Vector3, Zero};

use crate::{
    context::Viewport,
    error::Result,
    gfx::{
        camera::{OrbitCamera, Projection},
        geometry::{
            generate_arrow, generate_box, generate_cylinder, generate_grid, generate_sphere,
            ArrowDimensions,
        },
        resources::Material,
        scene::{rgb_from_hex, AmbientLight, Mesh, NodeId, Object, PointLight, Scene, Transform},
    },
};

pub const WALL_Z: f32 = 10.0;
pub const WALL_W: f32 = 3.0;
pub const WALL_H: f32 = 2.0;
pub const WALL_D: f32 = 0.5;

pub const DEFAULT_WALL_TEXTURE: &str = "assets/texture/brick_wall_512x512.jpg";

const WALL_MATERIAL: &str = "brick_wall";
const ARROW_MATERIAL: &str = "arrow";
const AXIS_MATERIAL: &str = "z_axis";
const GRID_MATERIAL: &str = "grid";
const MARKER_MATERIAL: &str = "light_marker";

/// Every tunable of the demo scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Half the gap between the walls' inner faces
    pub wall_z: f32,
    pub wall_width: f32,
    pub wall_height: f32,
    pub wall_depth: f32,
    pub wall_texture: PathBuf,
    pub arrow_shaft_width: f32,
    pub arrow_length: f32,
    pub axis_radius: f32,
    pub axis_segments: u32,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            wall_z: WALL_Z,
            wall_width: WALL_W,
            wall_height: WALL_H,
            wall_depth: WALL_D,
            wall_texture: PathBuf::from(DEFAULT_WALL_TEXTURE),
            arrow_shaft_width: 0.05,
            arrow_length: 1.0,
            axis_radius: 0.0125,
            axis_segments: 16,
            grid_size: 200.0,
            grid_divisions: 50,
        }
    }
}

/// The assembled scene plus handles the app needs later
pub struct DemoScene {
    pub scene: Scene,
    pub arrow: NodeId,
    pub walls: [NodeId; 2],
    pub axis: NodeId,
}

/// Instantiates the demo scene. Nothing is drawn until a rasterizer is given
/// the result.
pub fn build_scene(config: &SceneConfig) -> Result<DemoScene> {
    let mut scene = Scene::new();

    let point_light = PointLight::new(rgb_from_hex(0xFF0000), 500.0, Vector3::new(5.0, 5.0, 5.0));
    scene.add(point_light);
    scene.add(AmbientLight::new(rgb_from_hex(0xFFFFFF), 0.25));

    // Helpers
    scene.add_material(Material::basic(MARKER_MATERIAL, point_light.color).with_wireframe(true));
    scene.add(
        Object::new("light marker", Mesh::new(generate_sphere(1.0, 4, 2)?)?, MARKER_MATERIAL)
            .with_transform(Transform::from_position(point_light.position)),
    );
    scene.add_material(Material::basic(GRID_MATERIAL, rgb_from_hex(0x888888)));
    scene.add(Object::new(
        "grid",
        Mesh::new(generate_grid(config.grid_size, config.grid_divisions)?)?,
        GRID_MATERIAL,
    ));

    // Walls share a material but not a mesh
    scene.add_material(
        Material::basic(WALL_MATERIAL, rgb_from_hex(0xC0C0C0))
            .with_texture(config.wall_texture.clone())
            .with_opacity(0.8)
            .with_transparent(true)
            .with_wireframe(false),
    );
    let wall_offset = config.wall_z + 0.5 * config.wall_depth;
    let walls = [
        add_wall(&mut scene, config, "wall 1", wall_offset)?,
        add_wall(&mut scene, config, "wall 2", -wall_offset)?,
    ];

    scene.add_material(Material::basic(ARROW_MATERIAL, rgb_from_hex(0xEE0000)));
    let dims = ArrowDimensions::from_shaft(config.arrow_shaft_width, config.arrow_length);
    let arrow = scene.add(Object::new(
        "arrow",
        Mesh::new(generate_arrow(dims)?)?,
        ARROW_MATERIAL,
    ));

    scene.add_material(Material::basic(AXIS_MATERIAL, rgb_from_hex(0x008000)));
    let mut axis = Object::new(
        "z axis",
        Mesh::new(generate_cylinder(
            config.axis_radius,
            config.axis_radius,
            2.0 * config.wall_z,
            config.axis_segments,
        )?)?,
        AXIS_MATERIAL,
    );
    axis.transform.rotation.x = std::f32::consts::FRAC_PI_2;
    let axis = scene.add(axis);

    let stats = scene.statistics();
    log::info!(
        "Scene built: {} objects, {} lights, {} triangles",
        stats.object_count,
        stats.light_count,
        stats.total_triangles
    );

    Ok(DemoScene {
        scene,
        arrow,
        walls,
        axis,
    })
}

fn add_wall(scene: &mut Scene, config: &SceneConfig, name: &str, z: f32) -> Result<NodeId> {
    let geometry = generate_box(config.wall_width, config.wall_height, config.wall_depth)?;
    let mut wall = Object::new(name, Mesh::new(geometry)?, WALL_MATERIAL);
    wall.transform.translate_z(z);
    Ok(scene.add(wall))
}

/// Perspective camera at (-3, 0, 30) looking at the origin
pub fn build_camera(viewport: Viewport) -> OrbitCamera {
    let projection = Projection {
        fovy: Deg(50.0),
        aspect: viewport.aspect(),
        znear: 0.1,
        zfar: 1000.0,
    };
    let mut camera =
        OrbitCamera::looking_at(Vector3::new(-3.0, 0.0, 30.0), Vector3::zero(), projection);
    camera.update_view_proj();
    camera
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::SceneNode;
    use cgmath::InnerSpace;

    #[test]
    fn scene_contents_in_order() {
        let demo = build_scene(&SceneConfig::default()).unwrap();
        let nodes = demo.scene.nodes();

        assert!(matches!(nodes[0], SceneNode::PointLight(_)));
        assert!(matches!(nodes[1], SceneNode::AmbientLight(_)));
        let names: Vec<&str> = demo.scene.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["light marker", "grid", "wall 1", "wall 2", "arrow", "z axis"]
        );
    }

    #[test]
    fn lights_match_the_demo() {
        let demo = build_scene(&SceneConfig::default()).unwrap();
        let lighting = demo.scene.lighting();

        let point = lighting.point.unwrap();
        assert_eq!(point.color, [1.0, 0.0, 0.0]);
        assert_eq!(point.intensity, 500.0);
        assert_eq!(point.position, Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(lighting.ambient, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn walls_sit_outside_the_gap() {
        let demo = build_scene(&SceneConfig::default()).unwrap();
        let [first, second] = demo.walls;
        let first = demo.scene.object(first).unwrap();
        let second = demo.scene.object(second).unwrap();

        assert_eq!(first.transform.position, Vector3::new(0.0, 0.0, 10.25));
        assert_eq!(second.transform.position, Vector3::new(0.0, 0.0, -10.25));
        assert_eq!(first.mesh.geometry(), second.mesh.geometry());
        assert_eq!(first.material_id, second.material_id);

        let material = demo.scene.material_for(first);
        assert!(material.transparent);
        assert_eq!(material.opacity, 0.8);
        assert!(!material.wireframe);
        assert_eq!(material.texture.as_deref(), Some(std::path::Path::new(DEFAULT_WALL_TEXTURE)));
    }

    #[test]
    fn moving_one_wall_leaves_the_other() {
        let mut demo = build_scene(&SceneConfig::default()).unwrap();
        let [first, second] = demo.walls;

        demo.scene.object_mut(first).unwrap().transform.position.x = 4.0;

        assert_eq!(demo.scene.object(second).unwrap().transform.position.x, 0.0);
    }

    #[test]
    fn axis_lies_along_z() {
        let demo = build_scene(&SceneConfig::default()).unwrap();
        let axis = demo.scene.object(demo.axis).unwrap();

        // The cylinder's +Y end lands on +Z after the quarter turn about X
        let tip = axis.transform.matrix() * Vector3::new(0.0, WALL_Z, 0.0).extend(1.0);
        assert!((tip.truncate() - Vector3::new(0.0, 0.0, WALL_Z)).magnitude() < 1e-4);
        assert_eq!(demo.scene.material_for(axis).color, rgb_from_hex(0x008000));
    }

    #[test]
    fn arrow_starts_unrotated_with_seven_vertices() {
        let demo = build_scene(&SceneConfig::default()).unwrap();
        let arrow = demo.scene.object(demo.arrow).unwrap();

        assert_eq!(arrow.transform.rotation.z, 0.0);
        assert_eq!(arrow.mesh.geometry().vertex_count(), 7);
        assert_eq!(arrow.mesh.geometry().triangle_count(), 3);
        assert_eq!(demo.scene.material_for(arrow).color, rgb_from_hex(0xEE0000));
    }

    #[test]
    fn invalid_config_fails_before_anything_runs() {
        let config = SceneConfig {
            arrow_shaft_width: 0.0,
            ..SceneConfig::default()
        };
        let err = build_scene(&config).err().unwrap();
        assert!(err.is_invalid_parameter());

        let config = SceneConfig {
            wall_depth: -1.0,
            ..SceneConfig::default()
        };
        assert!(build_scene(&config).err().unwrap().is_invalid_parameter());
    }

    #[test]
    fn camera_starts_behind_the_walls() {
        let camera = build_camera(Viewport::new(800, 600));
        assert!((camera.eye - Vector3::new(-3.0, 0.0, 30.0)).magnitude() < 1e-4);
        assert_eq!(camera.target, Vector3::zero());
        assert_eq!(camera.projection.fovy, Deg(50.0));
        assert_eq!(camera.projection.aspect, 800.0 / 600.0);
        assert_eq!(camera.projection.znear, 0.1);
        assert_eq!(camera.projection.zfar, 1000.0);
    }
}
