use bevy_ecs::prelude::Entity;
use glam::Vec3;

/// Bounds on the effective pick radius. Raw radii come straight from scene
/// data and may be zero or absurdly large.
pub const MIN_PICK_RADIUS: f32 = 0.01;
pub const MAX_PICK_RADIUS: f32 = 0.1;

/// What kind of control an interactable exposes. Closed set so scroll routing
/// and highlight resolution can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Button,
    Lever,
    /// Continuous twist knob.
    TwistKnob,
    /// Detented twist knob with discrete positions.
    TwistKnobInt,
    Throttle,
    UiButton,
    UiScroller,
    HoverToggle,
    Generic,
}

impl Capability {
    /// Tags for which the scroll wheel has no native meaning, so scrolling
    /// over them falls through to viewport zoom.
    pub fn scroll_zooms(self) -> bool {
        matches!(self, Capability::Button | Capability::UiButton | Capability::HoverToggle)
    }

    /// Tags whose visual representative may live on a separate moving control
    /// part (button cap, lever arm, knob body) rather than the object itself.
    pub fn has_control_node(self) -> bool {
        matches!(
            self,
            Capability::Button | Capability::Lever | Capability::TwistKnob | Capability::TwistKnobInt
        )
    }
}

/// Non-owning snapshot of a scene object the user can operate. The scene owns
/// the object; `id` may go stale between registry refreshes and consumers are
/// expected to skip stale entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interactable {
    pub id: Entity,
    pub position: Vec3,
    pub radius: f32,
    pub capability: Capability,
}

impl Interactable {
    pub fn pick_radius(&self) -> f32 {
        self.radius.clamp(MIN_PICK_RADIUS, MAX_PICK_RADIUS)
    }
}
