use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::gameplay::session::{ActiveSession, TrackSession};

#[derive(Resource, Debug, Default)]
pub struct SimLogState {
    pub time_accum: f32,
    pub lines: u64,
}

/// One-line snapshot of the session.
pub fn sim_line(session: &TrackSession) -> String {
    let p = session.ball_position();
    let v = session.ball_velocity();
    format!(
        "SIM tick={} pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) statics={} state={:?}",
        session.tick_count(),
        p.x,
        p.y,
        p.z,
        v.x,
        v.y,
        v.z,
        session.static_body_count(),
        session.state()
    )
}

pub fn sim_logging_system(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut state: ResMut<SimLogState>,
    session: Option<Res<ActiveSession>>,
) {
    let interval = cfg.debug.sim_log_interval;
    if interval <= 0.0 {
        return;
    }
    let Some(session) = session else {
        return;
    };
    state.time_accum += time.delta_secs();
    if state.time_accum >= interval {
        state.time_accum = 0.0;
        state.lines += 1;
        info!(target: "session", "{}", sim_line(&session));
    }
}
