use bevy::math::{Affine3A, Vec3};
use std::collections::HashMap;
use track_roller::core::config::Vec3Def;
use track_roller::physics::{MeshTopology, PlacedTrackMesh, TrackMesh};
use track_roller::{GameConfig, GameState, TrackSession};

fn floor() -> PlacedTrackMesh {
    PlacedTrackMesh {
        mesh: TrackMesh {
            name: "Floor".into(),
            positions: vec![[-10.0, 0.0, -10.0], [0.0, 0.0, 10.0], [10.0, 0.0, -10.0]],
            indices: Some(vec![0, 1, 2]),
            topology: MeshTopology::TriangleList,
        },
        world_transform: Affine3A::IDENTITY,
    }
}

fn run_until_outcome(s: &mut TrackSession, max_ticks: u32) -> Option<u64> {
    for _ in 0..max_ticks {
        if let Some(out) = s.tick() {
            return Some(out.tick);
        }
    }
    None
}

#[test]
fn goal_at_spawn_passes_on_first_tick() {
    let mut cfg = GameConfig::default();
    cfg.goal.center = Vec3Def::new(0.0, 15.0, 0.0);
    let mut s = TrackSession::new(&cfg);
    let out = s.tick().expect("outcome on tick 1");
    assert_eq!(out.state, GameState::Passed);
    assert_eq!(out.tick, 1);
    assert_eq!(s.ball_position(), Vec3::new(0.0, 15.0, 0.0));
}

#[test]
fn free_fall_fails_at_a_deterministic_tick() {
    let cfg = GameConfig::default();
    let mut first = TrackSession::new(&cfg);
    let tick = run_until_outcome(&mut first, 1000).expect("ball should fall off");
    assert_eq!(first.state(), GameState::Failed);
    // Semi-implicit Euler at 1/60 s crosses y = -10 around tick 135.
    assert!((130..=140).contains(&tick), "failed at tick {tick}");
    assert!(first.ball_position().y < -10.0);

    let mut second = TrackSession::new(&cfg);
    assert_eq!(run_until_outcome(&mut second, 1000), Some(tick));
    assert_eq!(first.ball_position(), second.ball_position());
}

#[test]
fn ball_settles_on_flat_floor_without_drift() {
    let mut s = TrackSession::new(&GameConfig::default());
    let report = s.add_track_meshes(&[floor()], &HashMap::new());
    assert!(report.is_clean());
    for _ in 0..360 {
        s.tick();
    }
    assert_eq!(s.state(), GameState::Running);
    let p = s.ball_position();
    let v = s.ball_velocity();
    assert!((p.y - 0.5).abs() < 0.05, "resting height {}", p.y);
    assert!(v.y.abs() < 0.05, "vertical velocity {}", v.y);
    assert!(p.x.abs() < 0.05 && p.z.abs() < 0.05, "drifted to {p:?}");
}

#[test]
fn terminal_state_is_idempotent() {
    let mut s = TrackSession::new(&GameConfig::default());
    run_until_outcome(&mut s, 1000).expect("fall");
    let pos = s.ball_position();
    let vel = s.ball_velocity();
    let ticks = s.tick_count();
    s.input_mut().key_down("KeyW");
    for _ in 0..10 {
        assert!(s.tick().is_none());
    }
    let r = s.advance(1.0);
    assert_eq!(r.steps, 0);
    assert!(r.outcome.is_none());
    assert_eq!(s.ball_position(), pos);
    assert_eq!(s.ball_velocity(), vel);
    assert_eq!(s.tick_count(), ticks);
    assert_eq!(s.state(), GameState::Failed);
}

#[test]
fn advance_stops_at_the_outcome() {
    let mut cfg = GameConfig::default();
    cfg.goal.center = Vec3Def::new(0.0, 15.0, 0.0);
    let mut s = TrackSession::new(&cfg);
    let r = s.advance(5.0 / 60.0);
    assert_eq!(r.steps, 1);
    assert_eq!(r.outcome.map(|o| o.state), Some(GameState::Passed));
}

#[test]
fn rolling_forward_reaches_the_goal() {
    let mut cfg = GameConfig::default();
    cfg.ball.spawn = Vec3Def::new(0.0, 0.6, 0.0);
    cfg.goal.center = Vec3Def::new(0.0, 0.5, 6.0);
    let mut s = TrackSession::new(&cfg);
    s.add_track_meshes(
        &[PlacedTrackMesh {
            mesh: TrackMesh {
                name: "Strip".into(),
                positions: vec![
                    [-5.0, 0.0, -5.0],
                    [5.0, 0.0, -5.0],
                    [5.0, 0.0, 20.0],
                    [-5.0, 0.0, 20.0],
                ],
                indices: Some(vec![0, 2, 1, 0, 3, 2]),
                topology: MeshTopology::TriangleList,
            },
            world_transform: Affine3A::IDENTITY,
        }],
        &HashMap::new(),
    );
    s.input_mut().key_down("KeyW");
    run_until_outcome(&mut s, 600).expect("should reach the goal");
    assert_eq!(s.state(), GameState::Passed);
}
