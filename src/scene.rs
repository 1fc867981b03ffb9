//! Collaborator contracts. The engine decides *which* object is targeted and
//! *which* interaction call to issue; everything behind these traits (object
//! enumeration, color writes, camera property access, the physical effect of
//! an interaction) belongs to the embedding scene.

use bevy_ecs::prelude::Entity;
use glam::{Quat, Vec2, Vec3, Vec4};

use crate::interactable::Interactable;

/// Camera objects resolved from the scene. Only the eye camera is mandatory;
/// the HUD overlay and helmet cameras exist in some cockpits only.
#[derive(Debug, Clone, Copy)]
pub struct CameraObjects {
    pub eye: Entity,
    pub hmd: Option<Entity>,
    pub helmet: Option<Entity>,
}

/// Scene object enumeration and hierarchy access. Any call may return empty
/// or partial results; that is a retry-later situation, never an error.
pub trait SceneIndex {
    fn find_all_interactables(&self) -> Vec<Interactable>;
    fn find_camera_objects(&self) -> Option<CameraObjects>;
    /// Whether the object still exists. Registry entries can outlive their
    /// scene object by up to one tick.
    fn is_live(&self, id: Entity) -> bool;
    fn parent(&self, id: Entity) -> Option<Entity>;
}

/// Color access shared by both visual backends. Pure property access; the
/// only side effect of `set_color` is the color write itself.
pub trait ColorBackend {
    fn color(&self, element: Entity) -> Option<Vec4>;
    fn set_color(&mut self, element: Entity, color: Vec4);
}

/// 3-D visual backend: mesh renderers attached to scene nodes.
pub trait MeshBackend: ColorBackend {
    fn renderer_on(&self, node: Entity) -> Option<Entity>;
    fn renderer_in_children(&self, node: Entity) -> Option<Entity>;
    /// The moving control part (button cap, lever arm, knob body) for
    /// capabilities that have one. `None` when the object has no such part.
    fn control_node(&self, obj: &Interactable) -> Option<Entity>;
}

/// 2-D visual backend: UI images attached to scene nodes.
pub trait ImageBackend: ColorBackend {
    fn image_on(&self, node: Entity) -> Option<Entity>;
    fn image_in_children(&self, node: Entity) -> Option<Entity>;
    fn image_in_parents(&self, node: Entity) -> Option<Entity>;
}

/// Camera property access for the rig manager.
pub trait CameraBackend {
    /// World-space ray through a screen-space cursor position.
    fn screen_ray(&self, camera: Entity, cursor: Vec2) -> Option<(Vec3, Vec3)>;
    fn set_fov(&mut self, camera: Entity, fov: f32);
    /// Expand the camera viewport to fill the display (undo stereo warping).
    fn unwarp_viewport(&mut self, camera: Entity);
    fn set_local_rotation(&mut self, camera: Entity, rotation: Quat);
    fn reset_local_transform(&mut self, camera: Entity);
    /// Reset the playspace (the camera's parent rig) to its seated origin.
    fn reset_playspace(&mut self, camera: Entity);
    fn set_stereo_enabled(&mut self, enabled: bool);
}

/// Typed interaction calls, fire-and-forget from the dispatcher's side.
/// What a call physically does to the simulation is the scene's concern.
pub trait CapabilityActions {
    fn begin_interact(&mut self, obj: &Interactable);
    fn end_interact(&mut self, obj: &Interactable);
    fn twist_knob(&mut self, obj: &Interactable, toward_max: bool, amount: f32);
    fn step_twist_knob_int(&mut self, obj: &Interactable, steps: i32, wrap: bool);
    fn step_lever(&mut self, obj: &Interactable, steps: i32);
    fn nudge_throttle(&mut self, obj: &Interactable, delta: f32);
    fn scroll_ui(&mut self, obj: &Interactable, delta: Vec2);
}
