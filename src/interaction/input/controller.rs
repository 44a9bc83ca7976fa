use std::collections::HashMap;

use bevy::math::Vec3;

use crate::interaction::inputmap::types::{
    Action, KeyBindings, MoveAction, MovementSettings, VelocityPolicy,
};

/// Held-key state plus the bindings that turn it into per-tick velocity changes.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    held: HashMap<String, bool>,
    bindings: KeyBindings,
    movement: MovementSettings,
}

impl InputController {
    pub fn new(bindings: KeyBindings, movement: MovementSettings) -> Self {
        Self {
            held: HashMap::new(),
            bindings,
            movement,
        }
    }

    /// Returns `true` when the key was not already held.
    pub fn key_down(&mut self, key: &str) -> bool {
        let was = self.held.insert(key.to_string(), true);
        was != Some(true)
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.insert(key.to_string(), false);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    /// Keys currently marked as held.
    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.held.iter().filter(|(_, down)| **down).map(|(k, _)| k.as_str())
    }

    pub fn release_all(&mut self) {
        for v in self.held.values_mut() {
            *v = false;
        }
    }

    pub fn action_held(&self, action: Action) -> bool {
        self.bindings.keys(action).iter().any(|k| self.is_held(k))
    }

    /// Sum of the move actions currently held, each contributing `speed_per_tick` along its axis.
    pub fn velocity_delta(&self) -> Vec3 {
        MoveAction::ALL
            .into_iter()
            .filter(|m| self.action_held(Action::Move(*m)))
            .map(|m| m.axis() * self.movement.speed_per_tick)
            .sum()
    }

    /// One tick of input applied to the ball's velocity.
    pub fn apply(&self, velocity: Vec3) -> Vec3 {
        self.movement.policy.apply(velocity + self.velocity_delta())
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    pub fn movement(&self) -> MovementSettings {
        self.movement
    }

    pub fn set_movement(&mut self, movement: MovementSettings) {
        self.movement = movement;
    }

    pub fn policy(&self) -> VelocityPolicy {
        self.movement.policy
    }
}
