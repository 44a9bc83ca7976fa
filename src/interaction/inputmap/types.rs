use bevy::math::Vec3;
use bevy::prelude::Resource;
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;

/// Direction the ball is pushed while a bound key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveAction {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveAction {
    pub const ALL: [MoveAction; 4] = [Self::Forward, Self::Back, Self::Left, Self::Right];

    /// World axis this action accelerates along (+Z forward, +X left).
    pub fn axis(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
            Self::Left => Vec3::X,
            Self::Right => Vec3::NEG_X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Move(MoveAction),
    LogCoordinates,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Move(MoveAction::Forward),
        Action::Move(MoveAction::Back),
        Action::Move(MoveAction::Left),
        Action::Move(MoveAction::Right),
        Action::LogCoordinates,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Move(MoveAction::Forward) => "Forward",
            Action::Move(MoveAction::Back) => "Back",
            Action::Move(MoveAction::Left) => "Left",
            Action::Move(MoveAction::Right) => "Right",
            Action::LogCoordinates => "LogCoordinates",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

pub type KeyList = SmallVec<[String; 2]>;

/// Action -> key identifiers (`KeyW`, `ArrowUp`, ...). A key may drive several actions.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    map: HashMap<Action, KeyList>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(Action::Move(MoveAction::Forward), smallvec!["KeyW".to_string()]);
        map.insert(Action::Move(MoveAction::Back), smallvec!["KeyS".to_string()]);
        map.insert(Action::Move(MoveAction::Left), smallvec!["KeyA".to_string()]);
        map.insert(Action::Move(MoveAction::Right), smallvec!["KeyD".to_string()]);
        map.insert(Action::LogCoordinates, smallvec!["KeyC".to_string()]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn keys(&self, action: Action) -> &[String] {
        self.map.get(&action).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn set(&mut self, action: Action, keys: KeyList) {
        self.map.insert(action, keys);
    }

    pub fn is_bound(&self, action: Action, key: &str) -> bool {
        self.keys(action).iter().any(|k| k == key)
    }

    pub fn actions_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = Action> + 'a {
        Action::ALL
            .into_iter()
            .filter(move |a| self.is_bound(*a, key))
    }
}

/// Per-tick horizontal velocity shaping. `damping` scales XZ velocity by `1 - damping` each
/// tick; `max_speed` caps XZ speed. The defaults leave velocity untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityPolicy {
    pub max_speed: Option<f32>,
    pub damping: f32,
}

impl VelocityPolicy {
    pub fn apply(&self, velocity: Vec3) -> Vec3 {
        let mut horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        if self.damping > 0.0 {
            horizontal *= 1.0 - self.damping.clamp(0.0, 1.0);
        }
        if let Some(cap) = self.max_speed {
            horizontal = horizontal.clamp_length_max(cap.max(0.0));
        }
        Vec3::new(horizontal.x, velocity.y, horizontal.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    pub speed_per_tick: f32,
    pub policy: VelocityPolicy,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed_per_tick: 0.1,
            policy: VelocityPolicy::default(),
        }
    }
}

/// Bindings and movement tuning loaded from `input.toml`, consumed when the session is built.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputBindings {
    pub bindings: KeyBindings,
    pub movement: MovementSettings,
}
