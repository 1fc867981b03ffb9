use glam::Vec3;
use smallvec::SmallVec;

use crate::interactable::Interactable;
use crate::scene::SceneIndex;

/// Distance along the view ray of the point candidates are ranked against.
/// Ranking by proximity to this look-ahead point (rather than by raw hit
/// distance) keeps selection stable when near and far objects both intersect
/// a thin ray.
pub const LOOK_AHEAD_DEPTH: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

pub fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let mut t = -b - sqrt_d;
    if t < 0.0 {
        t = -b + sqrt_d;
    }
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Live set of interactable objects, replaced wholesale once per tick.
#[derive(Debug, Default)]
pub struct CandidateRegistry {
    candidates: Vec<Interactable>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh<S: SceneIndex + ?Sized>(&mut self, scene: &S) {
        self.candidates = scene.find_all_interactables();
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn candidates(&self) -> &[Interactable] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Resolve the targeted interactable for the current subtick: the intersected
/// candidate closest to the look-ahead point, ties broken by enumeration
/// order. Candidates whose scene object died since the last refresh are
/// skipped; that is expected between ticks.
pub fn pick_targeted<S: SceneIndex + ?Sized>(
    ray: Ray,
    candidates: &[Interactable],
    scene: &S,
) -> Option<Interactable> {
    let dir = ray.direction.normalize_or_zero();
    if dir.length_squared() <= f32::EPSILON {
        return None;
    }

    let mut hits: SmallVec<[&Interactable; 8]> = SmallVec::new();
    for candidate in candidates {
        if !scene.is_live(candidate.id) {
            continue;
        }
        if ray_sphere_intersection(ray.origin, dir, candidate.position, candidate.pick_radius())
            .is_some()
        {
            hits.push(candidate);
        }
    }

    let probe = ray.origin + dir * LOOK_AHEAD_DEPTH;
    let mut best: Option<(&Interactable, f32)> = None;
    for hit in hits {
        let proxy = hit.position.distance_squared(probe);
        match best {
            Some((_, current)) if proxy >= current => {}
            _ => best = Some((hit, proxy)),
        }
    }
    best.map(|(interactable, _)| *interactable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactable::Capability;
    use crate::scene::{CameraObjects, SceneIndex};
    use bevy_ecs::prelude::Entity;

    struct AllLive;

    impl SceneIndex for AllLive {
        fn find_all_interactables(&self) -> Vec<Interactable> {
            Vec::new()
        }
        fn find_camera_objects(&self) -> Option<CameraObjects> {
            None
        }
        fn is_live(&self, _id: Entity) -> bool {
            true
        }
        fn parent(&self, _id: Entity) -> Option<Entity> {
            None
        }
    }

    fn knob(raw: u32, position: Vec3, radius: f32) -> Interactable {
        Interactable { id: Entity::from_raw(raw), position, radius, capability: Capability::TwistKnob }
    }

    #[test]
    fn ray_sphere_reports_front_hits_only() {
        let hit = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 2.0), 0.5);
        assert!(hit.is_some());
        let behind = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -2.0), 0.5);
        assert!(behind.is_none());
    }

    #[test]
    fn pick_ignores_candidates_off_the_ray() {
        let ray = Ray { origin: Vec3::ZERO, direction: Vec3::Z };
        let on_ray = knob(1, Vec3::new(0.0, 0.0, 0.4), 0.05);
        let off_ray = knob(2, Vec3::new(1.0, 0.0, 0.4), 0.05);
        let picked = pick_targeted(ray, &[off_ray, on_ray], &AllLive);
        assert_eq!(picked.map(|i| i.id), Some(on_ray.id));
    }

    #[test]
    fn zero_direction_ray_picks_nothing() {
        let ray = Ray { origin: Vec3::ZERO, direction: Vec3::ZERO };
        let candidate = knob(1, Vec3::new(0.0, 0.0, 0.5), 0.05);
        assert!(pick_targeted(ray, &[candidate], &AllLive).is_none());
    }

    #[test]
    fn equidistant_candidates_resolve_to_the_first_enumerated() {
        let ray = Ray { origin: Vec3::ZERO, direction: Vec3::Z };
        // mirrored around the look-ahead point, identical proxy distance
        let nearer = knob(1, Vec3::new(0.0, 0.0, 0.45), 0.08);
        let farther = knob(2, Vec3::new(0.0, 0.0, 0.55), 0.08);
        for _ in 0..16 {
            let picked = pick_targeted(ray, &[nearer, farther], &AllLive);
            assert_eq!(picked.map(|i| i.id), Some(nearer.id));
        }
    }
}
