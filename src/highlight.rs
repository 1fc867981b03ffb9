use bevy_ecs::prelude::Entity;
use glam::Vec4;

use crate::interactable::Interactable;
use crate::scene::{ColorBackend, ImageBackend, MeshBackend, SceneIndex};

/// Opaque yellow, applied to the representative element of the targeted
/// object in both visual backends.
pub const HIGHLIGHT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Single-entry record of the one element currently shown in a non-original
/// color, plus the color to restore. At most one element per backend is ever
/// highlighted, so this is a pair rather than a map.
#[derive(Debug, Default)]
struct HighlightSlot {
    entry: Option<(Entity, Vec4)>,
}

impl HighlightSlot {
    /// Move the highlight to `element`. Re-selecting the element already held
    /// is a no-op so the recorded original color is never re-captured from a
    /// highlighted state.
    fn apply<B: ColorBackend + ?Sized>(&mut self, backend: &mut B, element: Option<Entity>) {
        if let (Some(new), Some((current, _))) = (element, self.entry.as_ref()) {
            if new == *current {
                return;
            }
        }
        if let Some((old, original)) = self.entry.take() {
            backend.set_color(old, original);
        }
        let Some(element) = element else {
            return;
        };
        let Some(original) = backend.color(element) else {
            return;
        };
        self.entry = Some((element, original));
        backend.set_color(element, HIGHLIGHT_COLOR);
    }

    /// Drop the record without a color write. Used on scene teardown, when
    /// the element is already gone.
    fn forget(&mut self) {
        self.entry = None;
    }

    fn element(&self) -> Option<Entity> {
        self.entry.as_ref().map(|(element, _)| *element)
    }
}

/// Restore-then-apply highlight bookkeeping across the two independent visual
/// backends. A single targeted object may resolve to a representative element
/// in either backend, both, or neither.
#[derive(Debug, Default)]
pub struct HighlightStateMachine {
    mesh: HighlightSlot,
    image: HighlightSlot,
}

impl HighlightStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked once per subtick with the fresh selection result. Resolving no
    /// representative element for a target is not an error; highlighting is
    /// simply skipped in that backend.
    pub fn update<S, M, I>(
        &mut self,
        target: Option<&Interactable>,
        scene: &S,
        mesh: &mut M,
        image: &mut I,
    ) where
        S: SceneIndex + ?Sized,
        M: MeshBackend + ?Sized,
        I: ImageBackend + ?Sized,
    {
        let mesh_element = target.and_then(|obj| resolve_mesh_element(obj, scene, mesh));
        self.mesh.apply(mesh, mesh_element);
        let image_element = target.and_then(|obj| resolve_image_element(obj, scene, image));
        self.image.apply(image, image_element);
    }

    /// Abrupt reset on scene change: the highlighted elements are owned by
    /// the outgoing scene, so no restore write is attempted.
    pub fn clear_abrupt(&mut self) {
        self.mesh.forget();
        self.image.forget();
    }

    pub fn highlighted_mesh_element(&self) -> Option<Entity> {
        self.mesh.element()
    }

    pub fn highlighted_image_element(&self) -> Option<Entity> {
        self.image.element()
    }
}

/// Fixed mesh-renderer lookup order, preserved from the scene hierarchy this
/// engine was tuned against: the object's own renderer, then a child
/// renderer, then (for capabilities with a moving control part) the control
/// node's renderer, its parent's, its grandparent's, and finally a renderer
/// anywhere under the control node.
fn resolve_mesh_element<S, M>(obj: &Interactable, scene: &S, mesh: &M) -> Option<Entity>
where
    S: SceneIndex + ?Sized,
    M: MeshBackend + ?Sized,
{
    if let Some(renderer) = mesh.renderer_on(obj.id) {
        return Some(renderer);
    }
    if let Some(renderer) = mesh.renderer_in_children(obj.id) {
        return Some(renderer);
    }
    if !obj.capability.has_control_node() {
        return None;
    }
    let control = mesh.control_node(obj)?;
    if let Some(renderer) = mesh.renderer_on(control) {
        return Some(renderer);
    }
    if let Some(parent) = scene.parent(control) {
        if let Some(renderer) = mesh.renderer_on(parent) {
            return Some(renderer);
        }
        if let Some(grandparent) = scene.parent(parent) {
            if let Some(renderer) = mesh.renderer_on(grandparent) {
                return Some(renderer);
            }
        }
    }
    mesh.renderer_in_children(control)
}

/// Fixed UI-image lookup order: the object's own image, then a child image,
/// then an image up the parent chain, then the parent chain of the object's
/// parent.
fn resolve_image_element<S, I>(obj: &Interactable, scene: &S, image: &I) -> Option<Entity>
where
    S: SceneIndex + ?Sized,
    I: ImageBackend + ?Sized,
{
    if let Some(element) = image.image_on(obj.id) {
        return Some(element);
    }
    if let Some(element) = image.image_in_children(obj.id) {
        return Some(element);
    }
    if let Some(element) = image.image_in_parents(obj.id) {
        return Some(element);
    }
    scene.parent(obj.id).and_then(|parent| image.image_in_parents(parent))
}
