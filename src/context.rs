use glam::Vec2;
use std::path::PathBuf;

use crate::camera_rig::{CameraRigManager, DEFAULT_FOV};
use crate::dispatch::{InteractionDispatcher, ScrollOutcome};
use crate::highlight::HighlightStateMachine;
use crate::input::{CursorAutohide, Input};
use crate::interactable::Interactable;
use crate::prefs::Preferences;
use crate::scene::{CameraBackend, CapabilityActions, ImageBackend, MeshBackend, SceneIndex};
use crate::targeting::{pick_targeted, CandidateRegistry, Ray};
use crate::tick::TickScheduler;

/// The whole engine as one explicitly constructed object, owned and driven by
/// the frame-loop shell. No process-wide state; two contexts over two scenes
/// are perfectly legal.
pub struct FlatviewContext {
    prefs: Preferences,
    prefs_path: PathBuf,
    scheduler: TickScheduler,
    registry: CandidateRegistry,
    targeted: Option<Interactable>,
    highlighter: HighlightStateMachine,
    dispatcher: InteractionDispatcher,
    rig: CameraRigManager,
    autohide: CursorAutohide,
    cursor_visible: bool,
}

impl FlatviewContext {
    pub fn new(prefs_path: impl Into<PathBuf>) -> Self {
        Self {
            prefs: Preferences::default(),
            prefs_path: prefs_path.into(),
            scheduler: TickScheduler::new(),
            registry: CandidateRegistry::new(),
            targeted: None,
            highlighter: HighlightStateMachine::new(),
            dispatcher: InteractionDispatcher::new(),
            rig: CameraRigManager::new(),
            autohide: CursorAutohide::new(),
            cursor_visible: true,
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn rig(&self) -> &CameraRigManager {
        &self.rig
    }

    pub fn targeted(&self) -> Option<&Interactable> {
        self.targeted.as_ref()
    }

    pub fn held(&self) -> Option<&Interactable> {
        self.dispatcher.held()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn candidate_count(&self) -> usize {
        self.registry.len()
    }

    /// Entering flatscreen mode: load preferences, kick the two-phase display
    /// reset, and bring the rest of the state to a clean slate.
    pub fn activate<S, C>(&mut self, scene: &S, cameras: &mut C)
    where
        S: SceneIndex + ?Sized,
        C: CameraBackend + ?Sized,
    {
        self.prefs = Preferences::load_or_default(&self.prefs_path);
        self.apply_rotation_limits();
        self.reset_state(scene, cameras);
        self.rig.begin_display_reset(cameras);
    }

    /// The active scene was replaced. Preferences are persisted, then all
    /// per-scene state is dropped abruptly; the outgoing scene's objects are
    /// gone, so no end-interaction or color-restore calls are issued.
    pub fn on_scene_change<S, C>(&mut self, scene: &S, cameras: &mut C)
    where
        S: SceneIndex + ?Sized,
        C: CameraBackend + ?Sized,
    {
        self.save_prefs();
        self.reset_state(scene, cameras);
        self.rig.begin_display_reset(cameras);
    }

    /// Head-tracking device changed out from under us; same full reset as a
    /// scene change, minus the preference write.
    pub fn on_head_device_change<S, C>(&mut self, scene: &S, cameras: &mut C)
    where
        S: SceneIndex + ?Sized,
        C: CameraBackend + ?Sized,
    {
        self.reset_state(scene, cameras);
    }

    fn reset_state<S, C>(&mut self, scene: &S, cameras: &mut C)
    where
        S: SceneIndex + ?Sized,
        C: CameraBackend + ?Sized,
    {
        self.dispatcher.clear_abrupt();
        self.highlighter.clear_abrupt();
        self.targeted = None;
        self.registry.clear();
        self.scheduler.reset();
        self.rig.invalidate();
        self.rig.set_fov(DEFAULT_FOV, cameras);
        self.rig.try_grab(scene, cameras);
    }

    /// One simulation step. Call exactly once per frame, then render.
    pub fn frame<S, M, I, C, A>(
        &mut self,
        input: &mut Input,
        dt: f32,
        scene: &S,
        mesh: &mut M,
        image: &mut I,
        cameras: &mut C,
        actions: &mut A,
    ) where
        S: SceneIndex + ?Sized,
        M: MeshBackend + ?Sized,
        I: ImageBackend + ?Sized,
        C: CameraBackend + ?Sized,
        A: CapabilityActions + ?Sized,
    {
        // phase two of a pending display reset runs at the frame boundary
        self.rig.finish_display_reset(cameras);

        self.cursor_visible = self.autohide.update(input.pointer_activity(), dt);

        if !self.rig.try_grab(scene, cameras) {
            // no rig, no interaction; retry next frame
            input.clear_frame();
            return;
        }

        if input.take_reset_rotation() {
            self.rig.reset_rotation(cameras);
        }
        if input.take_toggle_panel() {
            self.save_prefs();
        }

        if input.take_primary_press() && !input.pointer_over_ui() {
            self.dispatcher.press(self.targeted.as_ref(), actions);
        }
        // release fires even over shell chrome; a held interaction must not
        // get stuck because the pointer wandered onto a window
        if input.take_primary_release() {
            self.dispatcher.release(actions);
        }

        let wheel = input.take_wheel();
        if wheel.1 != 0.0 && !input.pointer_over_ui() {
            let modifier = input.secondary_held() || input.ctrl_held();
            let outcome = self.dispatcher.scroll(
                Vec2::new(wheel.0, wheel.1),
                self.targeted.as_ref(),
                modifier,
                self.prefs.zoom_requires_modifier,
                actions,
            );
            if let ScrollOutcome::Zoom(step) = outcome {
                self.rig.zoom_by(step, cameras);
            }
        }

        if input.secondary_held() && !input.pointer_over_ui() {
            let delta = Vec2::new(input.mouse_delta.0, input.mouse_delta.1);
            if delta != Vec2::ZERO {
                self.rig.apply_mouse_look(delta, self.prefs.mouse_sensitivity as f32, cameras);
            }
        }

        let events = self.scheduler.advance_frame();
        if events.tick {
            self.registry.refresh(scene);
        }
        if events.subtick {
            self.targeted = input
                .cursor_position()
                .and_then(|(x, y)| self.rig.view_ray(Vec2::new(x, y), cameras))
                .and_then(|(origin, direction)| {
                    pick_targeted(Ray { origin, direction }, self.registry.candidates(), scene)
                });
            self.highlighter.update(self.targeted.as_ref(), scene, mesh, image);
        }

        input.clear_frame();
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: u8) {
        self.prefs.set_mouse_sensitivity(sensitivity);
    }

    pub fn set_zoom_requires_modifier(&mut self, required: bool) {
        self.prefs.zoom_requires_modifier = required;
    }

    pub fn set_limit_x_rotation(&mut self, limited: bool) {
        self.prefs.limit_x_rotation = limited;
        self.rig.set_limit_x_rotation(limited);
    }

    pub fn set_limit_y_rotation(&mut self, limited: bool) {
        self.prefs.limit_y_rotation = limited;
        self.rig.set_limit_y_rotation(limited);
    }

    fn apply_rotation_limits(&mut self) {
        self.rig.set_limit_x_rotation(self.prefs.limit_x_rotation);
        self.rig.set_limit_y_rotation(self.prefs.limit_y_rotation);
    }

    fn save_prefs(&self) {
        if let Err(err) = self.prefs.save(&self.prefs_path) {
            eprintln!("[prefs] Save failed: {err:?}");
        }
    }
}
