//! Central system ordering labels to make the per-frame sequence explicit.
//! 1. Input (keyboard transitions forwarded into the session)
//! 2. Simulate (fixed-step advance of the track session)
//! 3. Present (ball transform, camera, HUD, debug output)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SessionSet {
    Input,
    Simulate,
    Present,
}
