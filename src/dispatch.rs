use glam::Vec2;

use crate::interactable::{Capability, Interactable};
use crate::scene::CapabilityActions;

/// FOV change per scroll notch on the zoom path.
pub const FOV_SCROLL_STEP: f32 = 5.0;
/// Continuous twist applied to a knob per scroll notch.
pub const KNOB_SCROLL_AMOUNT: f32 = 0.05;
/// Continuous nudge applied to a throttle per scroll notch.
pub const THROTTLE_SCROLL_AMOUNT: f32 = 0.05;
/// Fraction of the raw wheel delta forwarded to UI scrollers.
pub const UI_SCROLL_FRACTION: f32 = 0.1;

/// Where a scroll event ended up. `Zoom` carries the FOV delta for the caller
/// to apply to the camera rig; the dispatcher itself never touches the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    Zoom(f32),
    Dispatched,
    Ignored,
}

/// Routes the single mouse input channel to typed interaction calls while
/// enforcing the one-held-object invariant structurally: there is exactly one
/// slot to hold with.
#[derive(Debug, Default)]
pub struct InteractionDispatcher {
    held: Option<Interactable>,
}

impl InteractionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<&Interactable> {
        self.held.as_ref()
    }

    /// Primary button down. Begins an interaction only when nothing is held
    /// and something is targeted.
    pub fn press<A: CapabilityActions + ?Sized>(
        &mut self,
        target: Option<&Interactable>,
        actions: &mut A,
    ) {
        if self.held.is_some() {
            return;
        }
        let Some(target) = target else {
            return;
        };
        actions.begin_interact(target);
        self.held = Some(*target);
    }

    /// Primary button up. Ends the held interaction no matter what is
    /// currently targeted; moving off the object before releasing still ends
    /// the original interaction.
    pub fn release<A: CapabilityActions + ?Sized>(&mut self, actions: &mut A) {
        if let Some(held) = self.held.take() {
            actions.end_interact(&held);
        }
    }

    /// Abrupt reset on scene change: the held object is gone with its scene,
    /// so `end_interact` is deliberately not called.
    pub fn clear_abrupt(&mut self) {
        self.held = None;
    }

    /// Scroll-wheel routing. The wheel is overloaded between "zoom the
    /// viewport" and "operate the hovered control"; `zoom_requires_modifier`
    /// picks which is the default, and the modifier reaches the other one.
    pub fn scroll<A: CapabilityActions + ?Sized>(
        &mut self,
        delta: Vec2,
        target: Option<&Interactable>,
        modifier_held: bool,
        zoom_requires_modifier: bool,
        actions: &mut A,
    ) -> ScrollOutcome {
        if delta.y == 0.0 {
            return ScrollOutcome::Ignored;
        }
        let scroll_down = delta.y < 0.0;

        let zooms = if zoom_requires_modifier {
            modifier_held
        } else {
            target.map_or(true, |obj| obj.capability.scroll_zooms())
        };
        if zooms {
            let step = if scroll_down { FOV_SCROLL_STEP } else { -FOV_SCROLL_STEP };
            return ScrollOutcome::Zoom(step);
        }

        let Some(obj) = target else {
            return ScrollOutcome::Ignored;
        };
        match obj.capability {
            Capability::TwistKnob => {
                actions.twist_knob(obj, scroll_down, KNOB_SCROLL_AMOUNT);
                ScrollOutcome::Dispatched
            }
            Capability::TwistKnobInt => {
                actions.step_twist_knob_int(obj, if scroll_down { 1 } else { -1 }, true);
                ScrollOutcome::Dispatched
            }
            Capability::Lever => {
                actions.step_lever(obj, if scroll_down { 1 } else { -1 });
                ScrollOutcome::Dispatched
            }
            Capability::Throttle => {
                // sign inverted relative to the knob convention
                let nudge = if scroll_down { THROTTLE_SCROLL_AMOUNT } else { -THROTTLE_SCROLL_AMOUNT };
                actions.nudge_throttle(obj, nudge);
                ScrollOutcome::Dispatched
            }
            Capability::UiScroller => {
                actions.scroll_ui(obj, delta * UI_SCROLL_FRACTION);
                ScrollOutcome::Dispatched
            }
            Capability::Button
            | Capability::UiButton
            | Capability::HoverToggle
            | Capability::Generic => ScrollOutcome::Ignored,
        }
    }
}
