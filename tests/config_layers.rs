use std::io::Write;
use track_roller::core::config::CameraMode;
use track_roller::GameConfig;

fn ron_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "{contents}").unwrap();
    f
}

#[test]
fn later_layers_override_earlier_ones_field_by_field() {
    let base = ron_file(
        r#"(
            ball: (mass: 5.0, spawn: (x: 1.0, y: 12.0, z: 0.0)),
            camera: (mode: "Offset"),
        )"#,
    );
    let local = ron_file(r#"(ball: (radius: 0.75), goal: (center: (z: 30.0)))"#);
    let (cfg, used, errors) = GameConfig::load_layered([base.path(), local.path()]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.ball.mass, 5.0);
    assert_eq!(cfg.ball.radius, 0.75);
    assert_eq!(cfg.ball.spawn.y, 12.0);
    assert_eq!(cfg.camera.mode, CameraMode::Offset);
    assert_eq!(cfg.goal.center.z, 30.0);
    assert_eq!(cfg.goal.center.y, 0.0);
}

#[test]
fn missing_layer_is_reported_and_skipped() {
    let base = ron_file("(physics: (solver_iterations: 4))");
    let missing = std::path::Path::new("/nonexistent/game.local.ron");
    let (cfg, used, errors) = GameConfig::load_layered([base.path(), missing]);
    assert_eq!(used.len(), 1);
    assert_eq!(errors.len(), 1);
    assert_eq!(cfg.physics.solver_iterations, 4);
}

#[test]
fn unparsable_file_falls_back_to_defaults() {
    let f = ron_file("(ball: (mass: ");
    let (cfg, err) = GameConfig::load_or_default(f.path());
    assert!(err.is_some());
    assert_eq!(cfg.ball.mass, GameConfig::default().ball.mass);
}

#[test]
fn invalid_values_produce_warnings() {
    let f = ron_file("(ball: (radius: -1.0, mass: 0.0), physics: (max_steps_per_frame: 0))");
    let cfg = GameConfig::load_from_file(f.path()).unwrap();
    let w = cfg.validate();
    assert!(w.iter().any(|m| m.contains("ball.radius")), "{w:?}");
    assert!(w.iter().any(|m| m.contains("ball.mass")), "{w:?}");
    assert!(w.iter().any(|m| m.contains("max_steps_per_frame")), "{w:?}");
}

#[test]
fn shipped_config_parses_and_validates() {
    let cfg = GameConfig::load_from_file("assets/config/game.ron").unwrap();
    assert!(cfg.validate().is_empty());
    assert_eq!(cfg.camera.mode, CameraMode::FixedHeight);
    assert_eq!(cfg.ball.color, GameConfig::default().ball.color);
}
