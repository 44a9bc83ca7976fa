use bevy::prelude::*;

use crate::core::components::Ball;
use crate::core::config::GameConfig;
use crate::core::system::system_order::SessionSet;
use crate::gameplay::session::{ActiveSession, TrackSession};
use crate::gameplay::state::GameOutcome;
use crate::interaction::input::InputController;
use crate::interaction::inputmap::types::InputBindings;

/// Fired once when the run is passed or failed.
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionOutcome(pub GameOutcome);

/// Ask for the ball position to be logged and shown in the readout.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LogCoordinatesRequested;

/// Latest coordinate readout text, empty until first requested.
#[derive(Resource, Debug, Clone, Default)]
pub struct CoordinateReadout(pub String);

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SessionSet::Input, SessionSet::Simulate, SessionSet::Present).chain(),
        )
        .add_event::<SessionOutcome>()
        .add_event::<LogCoordinatesRequested>()
        .init_resource::<CoordinateReadout>()
        .add_systems(Startup, setup_session)
        .add_systems(Update, advance_session.in_set(SessionSet::Simulate))
        .add_systems(
            Update,
            (sync_ball_transform, log_coordinates).in_set(SessionSet::Present),
        );
    }
}

pub fn setup_session(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    bindings: Option<Res<InputBindings>>,
) {
    let input = bindings
        .map(|b| InputController::new(b.bindings.clone(), b.movement))
        .unwrap_or_default();
    let session = TrackSession::with_input(&cfg, input);
    info!(
        target: "session",
        "session ready: spawn=({:.2}, {:.2}, {:.2}) dt={:.4}",
        session.spawn_point().x,
        session.spawn_point().y,
        session.spawn_point().z,
        session.stepper().dt()
    );
    commands.insert_resource(ActiveSession(session));
}

pub fn advance_session(
    time: Res<Time>,
    session: Option<ResMut<ActiveSession>>,
    mut outcomes: EventWriter<SessionOutcome>,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.state().is_terminal() {
        return;
    }
    let report = session.advance(time.delta_secs());
    if let Some(outcome) = report.outcome {
        outcomes.write(SessionOutcome(outcome));
    }
}

fn sync_ball_transform(
    session: Option<Res<ActiveSession>>,
    mut q: Query<&mut Transform, With<Ball>>,
) {
    let Some(session) = session else {
        return;
    };
    let translation = session.ball_position();
    let rotation = session.ball_rotation();
    for mut tf in &mut q {
        tf.translation = translation;
        tf.rotation = rotation;
    }
}

fn log_coordinates(
    mut requests: EventReader<LogCoordinatesRequested>,
    session: Option<Res<ActiveSession>>,
    mut readout: ResMut<CoordinateReadout>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    let Some(session) = session else {
        return;
    };
    let label = session.coordinates_label();
    info!(target: "ball", "Ball Coordinates: {}", label);
    readout.0 = label;
}
