use glam::{Quat, Vec2, Vec3};

use crate::scene::{CameraBackend, CameraObjects, SceneIndex};

pub const DEFAULT_FOV: f32 = 60.0;
pub const MIN_FOV: f32 = 30.0;
pub const MAX_FOV: f32 = 120.0;
/// The helmet HUD camera renders a fixed narrow cone and never follows the
/// user-adjustable FOV.
pub const HELMET_FOV: f32 = 20.0;

pub const ROTATION_LIMIT_X_DEGREES: f32 = 160.0;
pub const ROTATION_LIMIT_Y_DEGREES: f32 = 89.0;
/// Sentinel meaning "this axis is unclamped".
pub const ROTATION_UNLIMITED: f32 = -1.0;

/// Lazily grabbed camera references plus the FOV and mouse-look state applied
/// to them. Everything here degrades to a no-op while ungrabbed; dependents
/// treat "no rig" as "do nothing", not as an error.
#[derive(Debug)]
pub struct CameraRigManager {
    cameras: Option<CameraObjects>,
    fov: f32,
    rotation: Vec2,
    rotation_limit_x: f32,
    rotation_limit_y: f32,
    display_reset_armed: bool,
}

impl Default for CameraRigManager {
    fn default() -> Self {
        Self {
            cameras: None,
            fov: DEFAULT_FOV,
            rotation: Vec2::ZERO,
            rotation_limit_x: ROTATION_LIMIT_X_DEGREES,
            rotation_limit_y: ROTATION_LIMIT_Y_DEGREES,
            display_reset_armed: false,
        }
    }
}

impl CameraRigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_grabbed(&self) -> bool {
        self.cameras.is_some()
    }

    pub fn cameras(&self) -> Option<&CameraObjects> {
        self.cameras.as_ref()
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn limits_x_rotation(&self) -> bool {
        self.rotation_limit_x >= 0.0
    }

    pub fn limits_y_rotation(&self) -> bool {
        self.rotation_limit_y >= 0.0
    }

    pub fn set_limit_x_rotation(&mut self, limited: bool) {
        self.rotation_limit_x = if limited { ROTATION_LIMIT_X_DEGREES } else { ROTATION_UNLIMITED };
    }

    pub fn set_limit_y_rotation(&mut self, limited: bool) {
        self.rotation_limit_y = if limited { ROTATION_LIMIT_Y_DEGREES } else { ROTATION_UNLIMITED };
    }

    /// Idempotent lazy grab. A successful resolution caches every camera the
    /// scene reports, unwarps their viewports, pins the helmet FOV, and
    /// reapplies the current FOV and a zeroed rotation. A failed resolution
    /// caches nothing, so every later call retries from scratch.
    pub fn try_grab<S, C>(&mut self, scene: &S, cameras: &mut C) -> bool
    where
        S: SceneIndex + ?Sized,
        C: CameraBackend + ?Sized,
    {
        if self.cameras.is_some() {
            return true;
        }
        let Some(objects) = scene.find_camera_objects() else {
            return false;
        };
        cameras.unwarp_viewport(objects.eye);
        if let Some(hmd) = objects.hmd {
            cameras.unwarp_viewport(hmd);
        }
        if let Some(helmet) = objects.helmet {
            cameras.unwarp_viewport(helmet);
            cameras.set_fov(helmet, HELMET_FOV);
        }
        self.cameras = Some(objects);
        self.reset_rotation(cameras);
        self.apply_fov(cameras);
        true
    }

    /// Drop every cached reference. Called on scene change and when the
    /// head-tracking device changes; the rig must be re-grabbed before the
    /// selector and zoom path function again.
    pub fn invalidate(&mut self) {
        self.cameras = None;
        self.display_reset_armed = false;
    }

    /// Clamp and store the FOV, then apply it to the eye and HUD cameras
    /// that exist. The helmet camera keeps its pinned FOV.
    pub fn set_fov<C: CameraBackend + ?Sized>(&mut self, fov: f32, cameras: &mut C) {
        self.fov = fov.clamp(MIN_FOV, MAX_FOV);
        self.apply_fov(cameras);
    }

    pub fn zoom_by<C: CameraBackend + ?Sized>(&mut self, delta: f32, cameras: &mut C) {
        self.set_fov(self.fov + delta, cameras);
    }

    fn apply_fov<C: CameraBackend + ?Sized>(&self, cameras: &mut C) {
        let Some(objects) = &self.cameras else {
            return;
        };
        cameras.set_fov(objects.eye, self.fov);
        if let Some(hmd) = objects.hmd {
            cameras.set_fov(hmd, self.fov);
        }
    }

    /// Accumulate mouse-look rotation in degrees, clamping each axis that has
    /// a limit, and write the resulting orientation to the eye camera.
    /// Quaternions here rather than Euler writes; sensitivity drifted at some
    /// angles with direct Euler assignment.
    pub fn apply_mouse_look<C: CameraBackend + ?Sized>(
        &mut self,
        delta: Vec2,
        sensitivity: f32,
        cameras: &mut C,
    ) {
        let Some(objects) = &self.cameras else {
            return;
        };
        self.rotation += delta * sensitivity;
        if self.rotation_limit_x >= 0.0 {
            self.rotation.x = self.rotation.x.clamp(-self.rotation_limit_x, self.rotation_limit_x);
        }
        if self.rotation_limit_y >= 0.0 {
            self.rotation.y = self.rotation.y.clamp(-self.rotation_limit_y, self.rotation_limit_y);
        }
        let yaw = Quat::from_axis_angle(Vec3::Y, self.rotation.x.to_radians());
        let pitch = Quat::from_axis_angle(Vec3::NEG_X, self.rotation.y.to_radians());
        cameras.set_local_rotation(objects.eye, yaw * pitch);
    }

    pub fn reset_rotation<C: CameraBackend + ?Sized>(&mut self, cameras: &mut C) {
        self.rotation = Vec2::ZERO;
        if let Some(objects) = &self.cameras {
            cameras.set_local_rotation(objects.eye, Quat::IDENTITY);
        }
    }

    /// The ray the selector casts, through the cursor from the eye camera.
    pub fn view_ray<C: CameraBackend + ?Sized>(
        &self,
        cursor: Vec2,
        cameras: &C,
    ) -> Option<(Vec3, Vec3)> {
        let objects = self.cameras.as_ref()?;
        cameras.screen_ray(objects.eye, cursor)
    }

    /// Phase one of the display reset: turn the stereo render path off and
    /// arm phase two. The transform writes must wait one full frame boundary
    /// for the render path to settle.
    pub fn begin_display_reset<C: CameraBackend + ?Sized>(&mut self, cameras: &mut C) {
        cameras.set_stereo_enabled(false);
        self.display_reset_armed = true;
    }

    /// Phase two, run at the start of the next frame: reset the eye camera's
    /// local transform and the playspace it sits in. Stays armed until the
    /// rig is grabbed.
    pub fn finish_display_reset<C: CameraBackend + ?Sized>(&mut self, cameras: &mut C) {
        if !self.display_reset_armed {
            return;
        }
        let Some(objects) = &self.cameras else {
            return;
        };
        cameras.reset_local_transform(objects.eye);
        cameras.reset_playspace(objects.eye);
        self.display_reset_armed = false;
    }

    pub fn display_reset_armed(&self) -> bool {
        self.display_reset_armed
    }
}
