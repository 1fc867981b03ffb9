use bevy_ecs::prelude::Entity;
use glam::{Vec3, Vec4};
use std::collections::HashMap;

use flatview::highlight::{HighlightStateMachine, HIGHLIGHT_COLOR};
use flatview::interactable::{Capability, Interactable};
use flatview::scene::{CameraObjects, ColorBackend, ImageBackend, MeshBackend, SceneIndex};

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

#[derive(Default)]
struct TestScene {
    parents: HashMap<Entity, Entity>,
}

impl SceneIndex for TestScene {
    fn find_all_interactables(&self) -> Vec<Interactable> {
        Vec::new()
    }
    fn find_camera_objects(&self) -> Option<CameraObjects> {
        None
    }
    fn is_live(&self, _id: Entity) -> bool {
        true
    }
    fn parent(&self, id: Entity) -> Option<Entity> {
        self.parents.get(&id).copied()
    }
}

#[derive(Default)]
struct MeshWorld {
    renderers_on: HashMap<Entity, Entity>,
    child_renderers: HashMap<Entity, Entity>,
    control_nodes: HashMap<Entity, Entity>,
    colors: HashMap<Entity, Vec4>,
}

impl ColorBackend for MeshWorld {
    fn color(&self, element: Entity) -> Option<Vec4> {
        self.colors.get(&element).copied()
    }
    fn set_color(&mut self, element: Entity, color: Vec4) {
        self.colors.insert(element, color);
    }
}

impl MeshBackend for MeshWorld {
    fn renderer_on(&self, node: Entity) -> Option<Entity> {
        self.renderers_on.get(&node).copied()
    }
    fn renderer_in_children(&self, node: Entity) -> Option<Entity> {
        self.child_renderers.get(&node).copied()
    }
    fn control_node(&self, obj: &Interactable) -> Option<Entity> {
        self.control_nodes.get(&obj.id).copied()
    }
}

#[derive(Default)]
struct ImageWorld {
    images_on: HashMap<Entity, Entity>,
    child_images: HashMap<Entity, Entity>,
    parent_images: HashMap<Entity, Entity>,
    colors: HashMap<Entity, Vec4>,
}

impl ColorBackend for ImageWorld {
    fn color(&self, element: Entity) -> Option<Vec4> {
        self.colors.get(&element).copied()
    }
    fn set_color(&mut self, element: Entity, color: Vec4) {
        self.colors.insert(element, color);
    }
}

impl ImageBackend for ImageWorld {
    fn image_on(&self, node: Entity) -> Option<Entity> {
        self.images_on.get(&node).copied()
    }
    fn image_in_children(&self, node: Entity) -> Option<Entity> {
        self.child_images.get(&node).copied()
    }
    fn image_in_parents(&self, node: Entity) -> Option<Entity> {
        self.parent_images.get(&node).copied()
    }
}

fn obj(raw: u32, capability: Capability) -> Interactable {
    Interactable { id: Entity::from_raw(raw), position: Vec3::ZERO, radius: 0.05, capability }
}

fn entity(raw: u32) -> Entity {
    Entity::from_raw(raw)
}

/// Object with its own renderer and image, original colors RED and BLUE.
fn simple_world(raw_obj: u32, raw_renderer: u32, raw_image: u32) -> (MeshWorld, ImageWorld) {
    let mut mesh = MeshWorld::default();
    mesh.renderers_on.insert(entity(raw_obj), entity(raw_renderer));
    mesh.colors.insert(entity(raw_renderer), RED);
    let mut image = ImageWorld::default();
    image.images_on.insert(entity(raw_obj), entity(raw_image));
    image.colors.insert(entity(raw_image), BLUE);
    (mesh, image)
}

#[test]
fn selecting_the_same_target_twice_captures_the_original_once() {
    let scene = TestScene::default();
    let (mut mesh, mut image) = simple_world(1, 100, 200);
    let target = obj(1, Capability::Button);
    let mut highlighter = HighlightStateMachine::new();

    highlighter.update(Some(&target), &scene, &mut mesh, &mut image);
    assert_eq!(mesh.colors[&entity(100)], HIGHLIGHT_COLOR);
    assert_eq!(image.colors[&entity(200)], HIGHLIGHT_COLOR);

    // second pass over the same element must not re-capture yellow as the
    // original color
    highlighter.update(Some(&target), &scene, &mut mesh, &mut image);
    highlighter.update(None, &scene, &mut mesh, &mut image);
    assert_eq!(mesh.colors[&entity(100)], RED);
    assert_eq!(image.colors[&entity(200)], BLUE);
}

#[test]
fn switching_targets_restores_the_previous_element_fully() {
    let scene = TestScene::default();
    let (mut mesh, mut image) = simple_world(1, 100, 200);
    mesh.renderers_on.insert(entity(2), entity(101));
    mesh.colors.insert(entity(101), BLUE);
    image.images_on.insert(entity(2), entity(201));
    image.colors.insert(entity(201), RED);

    let a = obj(1, Capability::Button);
    let b = obj(2, Capability::Lever);
    let mut highlighter = HighlightStateMachine::new();

    highlighter.update(Some(&a), &scene, &mut mesh, &mut image);
    highlighter.update(Some(&b), &scene, &mut mesh, &mut image);
    // A is back to original the moment B takes over
    assert_eq!(mesh.colors[&entity(100)], RED);
    assert_eq!(image.colors[&entity(200)], BLUE);
    assert_eq!(mesh.colors[&entity(101)], HIGHLIGHT_COLOR);
    assert_eq!(image.colors[&entity(201)], HIGHLIGHT_COLOR);

    highlighter.update(None, &scene, &mut mesh, &mut image);
    // nothing left in a non-original color
    assert_eq!(mesh.colors[&entity(101)], BLUE);
    assert_eq!(image.colors[&entity(201)], RED);
    assert!(highlighter.highlighted_mesh_element().is_none());
    assert!(highlighter.highlighted_image_element().is_none());
}

#[test]
fn backends_resolve_and_highlight_independently() {
    let scene = TestScene::default();
    // object 1 has only a mesh representative, object 2 only an image
    let mut mesh = MeshWorld::default();
    mesh.renderers_on.insert(entity(1), entity(100));
    mesh.colors.insert(entity(100), RED);
    let mut image = ImageWorld::default();
    image.images_on.insert(entity(2), entity(200));
    image.colors.insert(entity(200), BLUE);

    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&obj(1, Capability::Button)), &scene, &mut mesh, &mut image);
    assert_eq!(highlighter.highlighted_mesh_element(), Some(entity(100)));
    assert!(highlighter.highlighted_image_element().is_none());

    highlighter.update(Some(&obj(2, Capability::UiButton)), &scene, &mut mesh, &mut image);
    assert_eq!(mesh.colors[&entity(100)], RED);
    assert!(highlighter.highlighted_mesh_element().is_none());
    assert_eq!(highlighter.highlighted_image_element(), Some(entity(200)));
    assert_eq!(image.colors[&entity(200)], HIGHLIGHT_COLOR);
}

#[test]
fn unresolvable_target_skips_highlighting_without_error() {
    let scene = TestScene::default();
    let mut mesh = MeshWorld::default();
    let mut image = ImageWorld::default();
    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&obj(7, Capability::Generic)), &scene, &mut mesh, &mut image);
    assert!(highlighter.highlighted_mesh_element().is_none());
    assert!(highlighter.highlighted_image_element().is_none());
}

#[test]
fn mesh_falls_back_through_the_control_node_parent_chain() {
    // knob object with no renderer of its own; the renderer sits on the
    // grandparent of the knob's control node
    let mut scene = TestScene::default();
    let control = entity(10);
    let parent = entity(11);
    let grandparent = entity(12);
    scene.parents.insert(control, parent);
    scene.parents.insert(parent, grandparent);

    let mut mesh = MeshWorld::default();
    mesh.control_nodes.insert(entity(1), control);
    mesh.renderers_on.insert(grandparent, entity(100));
    mesh.colors.insert(entity(100), RED);
    let mut image = ImageWorld::default();

    let knob = obj(1, Capability::TwistKnob);
    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&knob), &scene, &mut mesh, &mut image);
    assert_eq!(highlighter.highlighted_mesh_element(), Some(entity(100)));
    assert_eq!(mesh.colors[&entity(100)], HIGHLIGHT_COLOR);
}

#[test]
fn control_node_chain_is_reserved_for_physical_controls() {
    // a Generic object never walks the control-node chain, even when the
    // backend would offer one
    let mut scene = TestScene::default();
    let control = entity(10);
    scene.parents.insert(control, entity(11));

    let mut mesh = MeshWorld::default();
    mesh.control_nodes.insert(entity(1), control);
    mesh.renderers_on.insert(control, entity(100));
    mesh.colors.insert(entity(100), RED);
    let mut image = ImageWorld::default();

    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&obj(1, Capability::Generic)), &scene, &mut mesh, &mut image);
    assert!(highlighter.highlighted_mesh_element().is_none());
}

#[test]
fn image_falls_back_to_the_parents_parent_chain() {
    let mut scene = TestScene::default();
    scene.parents.insert(entity(1), entity(2));

    let mut mesh = MeshWorld::default();
    let mut image = ImageWorld::default();
    // no image on the object or its own parent chain entry; only the
    // parent's chain resolves
    image.parent_images.insert(entity(2), entity(200));
    image.colors.insert(entity(200), BLUE);

    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&obj(1, Capability::UiScroller)), &scene, &mut mesh, &mut image);
    assert_eq!(highlighter.highlighted_image_element(), Some(entity(200)));
}

#[test]
fn abrupt_clear_leaves_scene_colors_untouched() {
    let scene = TestScene::default();
    let (mut mesh, mut image) = simple_world(1, 100, 200);
    let target = obj(1, Capability::Button);
    let mut highlighter = HighlightStateMachine::new();
    highlighter.update(Some(&target), &scene, &mut mesh, &mut image);

    highlighter.clear_abrupt();
    // no restore write happened; the slot is simply forgotten
    assert_eq!(mesh.colors[&entity(100)], HIGHLIGHT_COLOR);
    assert!(highlighter.highlighted_mesh_element().is_none());
}
