use std::collections::HashSet;

use bevy_rapier3d::rapier::prelude::*;

/// All-pairs AABB broad phase.
///
/// The scene holds one ball and a handful of track pieces, so a quadratic sweep each step is
/// cheaper than maintaining a spatial structure. Pairs where neither collider hangs off a
/// dynamic body are never reported.
#[derive(Debug, Default)]
pub struct NaiveBroadPhase {
    active: HashSet<(ColliderHandle, ColliderHandle)>,
    scratch: Vec<Entry>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: ColliderHandle,
    aabb: Aabb,
    dynamic: bool,
}

impl NaiveBroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs currently reported to the narrow phase.
    pub fn active_pairs(&self) -> usize {
        self.active.len()
    }
}

impl BroadPhase for NaiveBroadPhase {
    fn update(
        &mut self,
        _dt: Real,
        prediction_distance: Real,
        colliders: &mut ColliderSet,
        bodies: &RigidBodySet,
        _modified_colliders: &[ColliderHandle],
        removed_colliders: &[ColliderHandle],
        events: &mut Vec<BroadPhasePairEvent>,
    ) {
        // The narrow phase drops pairs of removed colliders on its own.
        if !removed_colliders.is_empty() {
            self.active.retain(|(a, b)| {
                !removed_colliders.contains(a) && !removed_colliders.contains(b)
            });
        }

        self.scratch.clear();
        for (handle, collider) in colliders.iter() {
            if !collider.is_enabled() {
                continue;
            }
            let dynamic = collider
                .parent()
                .and_then(|h| bodies.get(h))
                .is_some_and(|b| b.is_dynamic());
            self.scratch.push(Entry {
                handle,
                aabb: collider.compute_collision_aabb(prediction_distance / 2.0),
                dynamic,
            });
        }

        for (i, a) in self.scratch.iter().enumerate() {
            for b in &self.scratch[i + 1..] {
                if !a.dynamic && !b.dynamic {
                    continue;
                }
                let key = (a.handle, b.handle);
                let overlapping = a.aabb.intersects(&b.aabb);
                if overlapping {
                    if self.active.insert(key) {
                        events.push(BroadPhasePairEvent::AddPair(ColliderPair::new(
                            a.handle, b.handle,
                        )));
                    }
                } else if self.active.remove(&key) {
                    events.push(BroadPhasePairEvent::DeletePair(ColliderPair::new(
                        a.handle, b.handle,
                    )));
                }
            }
        }

        // Pairs whose collider was disabled since the last update.
        let live: HashSet<ColliderHandle> = self.scratch.iter().map(|e| e.handle).collect();
        let stale: Vec<_> = self
            .active
            .iter()
            .filter(|(a, b)| !live.contains(a) || !live.contains(b))
            .copied()
            .collect();
        for (a, b) in stale {
            self.active.remove(&(a, b));
            events.push(BroadPhasePairEvent::DeletePair(ColliderPair::new(a, b)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (RigidBodySet, ColliderSet, ColliderHandle, ColliderHandle, RigidBodyHandle) {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let ground = bodies.insert(RigidBodyBuilder::fixed());
        let g = colliders.insert_with_parent(
            ColliderBuilder::cuboid(10.0, 0.5, 10.0),
            ground,
            &mut bodies,
        );
        let ball = bodies.insert(RigidBodyBuilder::dynamic().translation(vector![0.0, 0.9, 0.0]));
        let b = colliders.insert_with_parent(ColliderBuilder::ball(0.5), ball, &mut bodies);
        (bodies, colliders, g, b, ball)
    }

    #[test]
    fn overlapping_dynamic_pair_is_added_once() {
        let (bodies, mut colliders, _, _, _) = setup();
        let mut bp = NaiveBroadPhase::new();
        let mut events = Vec::new();
        bp.update(1.0 / 60.0, 0.002, &mut colliders, &bodies, &[], &[], &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], BroadPhasePairEvent::AddPair(_)));

        events.clear();
        bp.update(1.0 / 60.0, 0.002, &mut colliders, &bodies, &[], &[], &mut events);
        assert!(events.is_empty(), "no duplicate AddPair expected");
        assert_eq!(bp.active_pairs(), 1);
    }

    #[test]
    fn separated_pair_is_deleted() {
        let (mut bodies, mut colliders, _, _, ball) = setup();
        let mut bp = NaiveBroadPhase::new();
        let mut events = Vec::new();
        bp.update(1.0 / 60.0, 0.002, &mut colliders, &bodies, &[], &[], &mut events);
        events.clear();

        bodies[ball].set_translation(vector![0.0, 50.0, 0.0], true);
        // Colliders follow their parent once positions are synced.
        let pos = *bodies[ball].position();
        for (_, c) in colliders.iter_mut() {
            if c.parent() == Some(ball) {
                c.set_position(pos);
            }
        }
        bp.update(1.0 / 60.0, 0.002, &mut colliders, &bodies, &[], &[], &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], BroadPhasePairEvent::DeletePair(_)));
        assert_eq!(bp.active_pairs(), 0);
    }

    #[test]
    fn static_static_pairs_are_skipped() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        for _ in 0..3 {
            let h = bodies.insert(RigidBodyBuilder::fixed());
            colliders.insert_with_parent(ColliderBuilder::cuboid(1.0, 1.0, 1.0), h, &mut bodies);
        }
        let mut bp = NaiveBroadPhase::new();
        let mut events = Vec::new();
        bp.update(1.0 / 60.0, 0.002, &mut colliders, &bodies, &[], &[], &mut events);
        assert!(events.is_empty());
    }
}
