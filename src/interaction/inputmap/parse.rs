use super::types::*;
use std::collections::HashMap;

/// Result of parsing `input.toml`. Anything invalid keeps its default and is reported in `errors`.
#[derive(Debug, Default)]
pub struct ParsedInputConfig {
    pub bindings: KeyBindings,
    pub movement: MovementSettings,
    pub errors: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct MovementToml {
    speed_per_tick: Option<f32>,
    max_speed: Option<f32>,
    damping: Option<f32>,
}

#[derive(Debug, serde::Deserialize)]
struct RootToml {
    bindings: Option<HashMap<String, Vec<String>>>,
    movement: Option<MovementToml>,
}

pub fn parse_input_toml(raw: &str) -> ParsedInputConfig {
    let mut result = ParsedInputConfig::default();
    let root: RootToml = match toml::from_str(raw) {
        Ok(r) => r,
        Err(e) => {
            result.errors.push(format!("Top-level parse: {e}"));
            return result;
        }
    };

    if let Some(map) = root.bindings {
        // Sorted so error order is stable.
        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (action_name, list) in entries {
            let Some(action) = Action::from_name(&action_name) else {
                result
                    .errors
                    .push(format!("Binding references unknown action '{}'", action_name));
                continue;
            };
            let mut keys = KeyList::new();
            for spec in &list {
                match parse_key_id(spec) {
                    Ok(k) => {
                        if !keys.contains(&k) {
                            keys.push(k);
                        }
                    }
                    Err(err) => result
                        .errors
                        .push(format!("[binding {} '{}'] {err}", action_name, spec)),
                }
            }
            if keys.is_empty() {
                result.errors.push(format!(
                    "Action {} has no usable keys; keeping default",
                    action_name
                ));
                continue;
            }
            result.bindings.set(action, keys);
        }
    }

    if let Some(m) = root.movement {
        if let Some(s) = m.speed_per_tick {
            if s.is_finite() && s >= 0.0 {
                result.movement.speed_per_tick = s;
            } else {
                result
                    .errors
                    .push(format!("movement.speed_per_tick {} must be finite and >= 0", s));
            }
        }
        if let Some(cap) = m.max_speed {
            if cap.is_finite() && cap > 0.0 {
                result.movement.policy.max_speed = Some(cap);
            } else {
                result
                    .errors
                    .push(format!("movement.max_speed {} must be finite and > 0", cap));
            }
        }
        if let Some(d) = m.damping {
            if (0.0..1.0).contains(&d) {
                result.movement.policy.damping = d;
            } else {
                result
                    .errors
                    .push(format!("movement.damping {} outside [0, 1)", d));
            }
        }
    }
    result
}

/// Key ids are the `KeyCode` variant names as Bevy prints them (`KeyW`, `ArrowUp`, `Space`).
fn parse_key_id(spec: &str) -> Result<String, String> {
    let id = spec.trim();
    let id = id.strip_prefix("Key:").unwrap_or(id);
    if id.is_empty() {
        return Err("Empty key id".into());
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("Invalid key id '{}': expected a KeyCode name", id));
    }
    Ok(id.to_string())
}
