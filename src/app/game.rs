// This file is part of Track Roller.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::level::TrackLoaderPlugin;
use crate::debug::DebugPlugin;
use crate::gameplay::plugin::SessionPlugin;
use crate::interaction::inputmap::plugin::InputMapPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::hud::hud::HudPlugin;
use crate::rendering::scene::scene::ScenePlugin;

/// Everything the game adds on top of `DefaultPlugins`. Expects a `GameConfig` resource.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            InputMapPlugin,
            SessionPlugin,
            TrackLoaderPlugin,
            ScenePlugin,
            CameraPlugin,
            HudPlugin,
            DebugPlugin,
        ));
    }
}
