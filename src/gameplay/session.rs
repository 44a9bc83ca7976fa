//! The per-run simulation context: world, ball, input, win/fail evaluation and the fixed stepper.
//!
//! Nothing here touches the ECS; the Bevy side wraps a session in [`ActiveSession`] and drives
//! it once per frame, while tests drive it directly.

use std::collections::HashMap;

use bevy::log::debug;
use bevy::math::{Quat, Vec3};
use bevy::prelude::{Deref, DerefMut, Resource};

use crate::core::config::GameConfig;
use crate::debug::format_coordinates;
use crate::gameplay::state::{GameOutcome, GameState, GameStateEvaluator};
use crate::interaction::input::controller::InputController;
use crate::interaction::inputmap::types::{KeyBindings, MovementSettings};
use crate::physics::{
    build_track_bodies, BallHandle, FixedStepper, MeshOverride, PlacedTrackMesh, RigidBodyWorld,
    TrackBuildReport,
};

/// What one call to [`TrackSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdvanceReport {
    pub steps: u32,
    pub outcome: Option<GameOutcome>,
}

pub struct TrackSession {
    world: RigidBodyWorld,
    ball: BallHandle,
    spawn: Vec3,
    input: InputController,
    evaluator: GameStateEvaluator,
    stepper: FixedStepper,
    ticks: u64,
}

impl TrackSession {
    /// Session with default key bindings and movement.
    pub fn new(cfg: &GameConfig) -> Self {
        Self::with_input(
            cfg,
            InputController::new(KeyBindings::default(), MovementSettings::default()),
        )
    }

    pub fn with_input(cfg: &GameConfig, input: InputController) -> Self {
        let settings = cfg.physics.world_settings();
        let timestep = settings.timestep;
        let mut world = RigidBodyWorld::new(settings);
        let ball_settings = cfg.ball.settings();
        let ball = world.spawn_ball(&ball_settings);
        Self {
            world,
            ball,
            spawn: ball_settings.spawn,
            input,
            evaluator: GameStateEvaluator::new(cfg.goal.region(), cfg.fall.plane()),
            stepper: FixedStepper::new(timestep, cfg.physics.max_steps_per_frame),
            ticks: 0,
        }
    }

    /// One fixed step: evaluate, push input, step, evaluate. A no-op once the run has ended.
    pub fn tick(&mut self) -> Option<GameOutcome> {
        if self.state().is_terminal() {
            return None;
        }
        self.ticks += 1;
        // Pre-step check catches a goal that already contains the ball.
        if let Some(outcome) = self.evaluator.evaluate(self.ball_position(), self.ticks) {
            return Some(outcome);
        }
        let v = self.ball_velocity();
        self.world.set_ball_linvel(self.input.apply(v));
        self.world.step();
        self.evaluator.evaluate(self.ball_position(), self.ticks)
    }

    /// Runs as many fixed ticks as `frame_dt` covers, stopping at the first outcome.
    pub fn advance(&mut self, frame_dt: f32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if self.state().is_terminal() {
            return report;
        }
        let steps = self.stepper.accumulate(frame_dt);
        for _ in 0..steps {
            report.steps += 1;
            if let Some(outcome) = self.tick() {
                report.outcome = Some(outcome);
                self.stepper.reset();
                break;
            }
        }
        report
    }

    /// Appends one static body per valid mesh. Safe to call between ticks at any point.
    pub fn add_track_meshes(
        &mut self,
        meshes: &[PlacedTrackMesh],
        overrides: &HashMap<String, MeshOverride>,
    ) -> TrackBuildReport {
        let report = build_track_bodies(&mut self.world, meshes, overrides);
        debug!(
            target: "session",
            "track meshes added at tick {} statics={}",
            self.ticks,
            self.world.static_body_count()
        );
        report
    }

    pub fn state(&self) -> GameState {
        self.evaluator.state()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.evaluator.outcome()
    }

    pub fn ball_position(&self) -> Vec3 {
        self.world.ball_position().unwrap_or(self.spawn)
    }

    pub fn ball_rotation(&self) -> Quat {
        self.world.ball_rotation().unwrap_or(Quat::IDENTITY)
    }

    pub fn ball_velocity(&self) -> Vec3 {
        self.world.ball_linvel().unwrap_or(Vec3::ZERO)
    }

    pub fn ball_angular_velocity(&self) -> Vec3 {
        self.world.ball_angvel().unwrap_or(Vec3::ZERO)
    }

    pub fn ball(&self) -> BallHandle {
        self.ball
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn evaluator(&self) -> &GameStateEvaluator {
        &self.evaluator
    }

    pub fn world(&self) -> &RigidBodyWorld {
        &self.world
    }

    pub fn stepper(&self) -> &FixedStepper {
        &self.stepper
    }

    pub fn static_body_count(&self) -> usize {
        self.world.static_body_count()
    }

    /// `"X: .., Y: .., Z: .."` for the current ball position.
    pub fn coordinates_label(&self) -> String {
        format_coordinates(self.ball_position())
    }
}

/// ECS handle on the running session.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSession(pub TrackSession);
