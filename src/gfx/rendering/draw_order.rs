//! Sorting of scene objects into the passes of a frame

use cgmath::{InnerSpace, Vector3};

use crate::gfx::{
    geometry::Topology,
    scene::{Object, Scene},
};

/// Visible objects grouped by the pipeline that draws them
#[derive(Default)]
pub struct DrawLists<'a> {
    pub opaque: Vec<&'a Object>,
    pub lines: Vec<&'a Object>,
    /// Farthest from the camera first
    pub transparent: Vec<&'a Object>,
}

impl DrawLists<'_> {
    pub fn len(&self) -> usize {
        self.opaque.len() + self.lines.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups visible objects for a camera at `eye`.
///
/// Line geometry and wireframe materials go to the line pass, blended
/// materials to the transparent pass sorted back to front, everything else
/// to the opaque pass in insertion order.
pub fn sort_draws(scene: &Scene, eye: Vector3<f32>) -> DrawLists<'_> {
    let mut lists = DrawLists::default();

    for object in scene.objects().filter(|object| object.visible) {
        let material = scene.material_for(object);
        if material.wireframe || object.mesh.geometry().topology == Topology::Lines {
            lists.lines.push(object);
        } else if material.is_blended() {
            lists.transparent.push(object);
        } else {
            lists.opaque.push(object);
        }
    }

    lists.transparent.sort_by(|a, b| {
        let da = (a.transform.position - eye).magnitude2();
        let db = (b.transform.position - eye).magnitude2();
        db.total_cmp(&da)
    });

    lists
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{generate_box, generate_grid},
        resources::Material,
        scene::{Mesh, Transform},
    };

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_material(Material::basic("glass", [1.0; 3]).with_opacity(0.5).with_transparent(true));
        scene.add_material(Material::basic("wire", [1.0; 3]).with_wireframe(true));
        scene.add_material(Material::basic("solid", [1.0; 3]));

        let boxed = |name: &str, material: &str, z: f32| {
            Object::new(name, Mesh::new(generate_box(1.0, 1.0, 1.0).unwrap()).unwrap(), material)
                .with_transform(Transform::from_position(Vector3::new(0.0, 0.0, z)))
        };
        scene.add(boxed("near glass", "glass", 10.0));
        scene.add(boxed("far glass", "glass", -10.0));
        scene.add(boxed("solid", "solid", 0.0));
        scene.add(boxed("wire", "wire", 0.0));
        scene.add(Object::new(
            "grid",
            Mesh::new(generate_grid(10.0, 2).unwrap()).unwrap(),
            "solid",
        ));
        scene
    }

    fn names<'a>(objects: &[&'a Object]) -> Vec<&'a str> {
        objects.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn transparent_objects_sort_back_to_front() {
        let scene = scene();

        let lists = sort_draws(&scene, Vector3::new(0.0, 0.0, 30.0));
        assert_eq!(names(&lists.transparent), vec!["far glass", "near glass"]);

        let lists = sort_draws(&scene, Vector3::new(0.0, 0.0, -30.0));
        assert_eq!(names(&lists.transparent), vec!["near glass", "far glass"]);
    }

    #[test]
    fn lines_and_wireframes_share_the_line_pass() {
        let scene = scene();
        let lists = sort_draws(&scene, Vector3::new(0.0, 0.0, 30.0));

        assert_eq!(names(&lists.opaque), vec!["solid"]);
        assert_eq!(names(&lists.lines), vec!["wire", "grid"]);
        assert_eq!(lists.len(), 5);
    }

    #[test]
    fn hidden_objects_are_skipped() {
        let mut scene = scene();
        for object in scene.objects_mut() {
            object.visible = false;
        }
        assert!(sort_draws(&scene, Vector3::new(0.0, 0.0, 30.0)).is_empty());
    }
}
