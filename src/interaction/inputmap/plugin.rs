use bevy::prelude::*;

use crate::core::system::system_order::SessionSet;

use super::parse::parse_input_toml;
use super::systems::forward_keyboard_to_session;
use super::types::InputBindings;

pub struct InputMapPlugin;
impl Plugin for InputMapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputBindings>()
            .add_systems(PreStartup, load_input_bindings)
            .add_systems(Update, forward_keyboard_to_session.in_set(SessionSet::Input));
    }
}

fn load_input_bindings(mut commands: Commands) {
    #[cfg(target_arch = "wasm32")]
    let raw: String = include_str!("../../../assets/config/input.toml").to_string();
    #[cfg(not(target_arch = "wasm32"))]
    let raw: String = {
        let path = std::env::var("INPUT_CONFIG_PATH")
            .unwrap_or_else(|_| "assets/config/input.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    target: "input",
                    "input map {} unreadable ({e}); using default bindings", path
                );
                String::new()
            }
        }
    };
    let parsed = parse_input_toml(&raw);
    if !parsed.errors.is_empty() {
        for e in &parsed.errors {
            error!(target: "input", "INPUT MAP ERROR: {e}");
        }
    } else {
        info!(
            target: "input",
            "Input map loaded: speed_per_tick={}", parsed.movement.speed_per_tick
        );
    }
    commands.insert_resource(InputBindings {
        bindings: parsed.bindings,
        movement: parsed.movement,
    });
}
