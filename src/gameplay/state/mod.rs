//! Win/fail evaluation driven by the ball's simulated position.

use bevy::log::info;
use bevy::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Running,
    Passed,
    Failed,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameState::Running)
    }
}

/// Emitted exactly once, on the tick the state leaves `Running`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOutcome {
    pub state: GameState,
    pub tick: u64,
    pub position: Vec3,
}

/// Axis-aligned box around the goal point. Membership is strict on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRegion {
    pub center: Vec3,
    pub half_extent: f32,
}

impl GoalRegion {
    pub fn contains(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        d.x < self.half_extent && d.y < self.half_extent && d.z < self.half_extent
    }
}

/// Half-space the ball must stay above: it has fallen once `dot(p, normal) < offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallPlane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for FallPlane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: -10.0,
        }
    }
}

impl FallPlane {
    /// Normalises `normal`; a zero normal falls back to +Y.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
            offset,
        }
    }

    pub fn has_fallen(&self, p: Vec3) -> bool {
        p.dot(self.normal) < self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameStateEvaluator {
    state: GameState,
    goal: GoalRegion,
    fall: FallPlane,
    outcome: Option<GameOutcome>,
}

impl GameStateEvaluator {
    pub fn new(goal: GoalRegion, fall: FallPlane) -> Self {
        Self {
            state: GameState::Running,
            goal,
            fall,
            outcome: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn goal(&self) -> &GoalRegion {
        &self.goal
    }

    pub fn fall_plane(&self) -> &FallPlane {
        &self.fall
    }

    /// The outcome that ended the run, if any.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Checks the goal first, then the fall plane. Returns the outcome on the transition only.
    pub fn evaluate(&mut self, position: Vec3, tick: u64) -> Option<GameOutcome> {
        if self.state.is_terminal() {
            return None;
        }
        let next = if self.goal.contains(position) {
            GameState::Passed
        } else if self.fall.has_fallen(position) {
            GameState::Failed
        } else {
            return None;
        };
        self.state = next;
        let outcome = GameOutcome {
            state: next,
            tick,
            position,
        };
        self.outcome = Some(outcome);
        info!(
            target: "session",
            "{:?} at tick {} pos=({:.2}, {:.2}, {:.2})",
            next, tick, position.x, position.y, position.z
        );
        Some(outcome)
    }
}
