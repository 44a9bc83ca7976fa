use bevy::prelude::*;

use track_roller::{GameConfig, GamePlugin};

/// Config load messages, logged once `LogPlugin` is up.
#[derive(Resource, Default)]
struct ConfigReport {
    used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> (GameConfig, ConfigReport) {
    // No local override layer on wasm.
    const RAW: &str = include_str!("../assets/config/game.ron");
    let mut report = ConfigReport::default();
    let cfg = match GameConfig::from_ron_str(RAW) {
        Ok(cfg) => {
            report.used.push("embedded game.ron".into());
            cfg
        }
        Err(e) => {
            report.errors.push(e);
            GameConfig::default()
        }
    };
    (cfg, report)
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> (GameConfig, ConfigReport) {
    let base = std::env::var("GAME_CONFIG_PATH")
        .unwrap_or_else(|_| "assets/config/game.ron".to_string());
    let (cfg, used, errors) =
        GameConfig::load_layered([base.as_str(), "assets/config/game.local.ron"]);
    (
        cfg,
        ConfigReport {
            used,
            errors,
            warnings: Vec::new(),
        },
    )
}

fn log_config_report(report: Res<ConfigReport>, cfg: Res<GameConfig>) {
    for e in &report.errors {
        warn!(target: "config", "CONFIG LOAD ISSUE: {e}");
    }
    if report.used.is_empty() {
        info!(target: "config", "No config layers found; using defaults");
    } else {
        info!(target: "config", used = ?report.used, "Config layers loaded");
    }
    for w in &report.warnings {
        warn!(target: "config", "CONFIG WARNING: {w}");
    }
    info!(
        target: "config",
        model = %cfg.track.model_path,
        timestep = cfg.physics.timestep,
        "Track summary"
    );
}

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }

    let (cfg, mut report) = load_config();
    report.warnings = cfg.validate();

    let window = Window {
        title: cfg.window.title.clone(),
        resolution: (cfg.window.width, cfg.window.height).into(),
        resizable: true,
        #[cfg(target_arch = "wasm32")]
        canvas: Some("#bevy".into()),
        #[cfg(target_arch = "wasm32")]
        fit_canvas_to_parent: true,
        ..default()
    };

    let exit = App::new()
        .insert_resource(cfg)
        .insert_resource(report)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .add_systems(PreStartup, log_config_report)
        .run();

    if let AppExit::Error(code) = exit {
        anyhow::bail!("app exited with code {code}");
    }
    Ok(())
}
