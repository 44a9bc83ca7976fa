//! Keyboard transitions -> session input.
use std::collections::HashSet;

use bevy::prelude::*;

use crate::gameplay::plugin::LogCoordinatesRequested;
use crate::gameplay::session::ActiveSession;

use super::types::Action;

/// Key identifier as the bindings spell it (`KeyW`, `ArrowUp`, `Space`).
pub fn key_id(key: KeyCode) -> String {
    format!("{key:?}")
}

/// Forwards this frame's transitions, then reconciles held keys with the keyboard's level
/// state so a press and release inside one frame (or a missed frame) cannot leave a key held.
pub fn forward_keyboard_to_session(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Option<ResMut<ActiveSession>>,
    mut coords: EventWriter<LogCoordinatesRequested>,
) {
    let Some(mut session) = session else {
        return;
    };
    for key in keyboard.get_just_pressed() {
        let id = key_id(*key);
        let fresh = session.input_mut().key_down(&id);
        if fresh && session.input().bindings().is_bound(Action::LogCoordinates, &id) {
            coords.write(LogCoordinatesRequested);
        }
    }
    for key in keyboard.get_just_released() {
        session.input_mut().key_up(&key_id(*key));
    }

    let pressed: HashSet<String> = keyboard.get_pressed().map(|k| key_id(*k)).collect();
    let stale: Vec<String> = session
        .input()
        .held_keys()
        .filter(|k| !pressed.contains(*k))
        .map(str::to_string)
        .collect();
    for key in &stale {
        session.input_mut().key_up(key);
    }
    for key in &pressed {
        session.input_mut().key_down(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ids_match_binding_names() {
        assert_eq!(key_id(KeyCode::KeyW), "KeyW");
        assert_eq!(key_id(KeyCode::ArrowUp), "ArrowUp");
        assert_eq!(key_id(KeyCode::Space), "Space");
    }
}
