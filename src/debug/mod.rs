//! Debug module: coordinate formatting is always built; the periodic SIM log and gizmo
//! outlines only with `--features debug`.

pub mod coords;
#[cfg(feature = "debug")]
mod gizmos;
#[cfg(feature = "debug")]
pub mod logging;

pub use coords::format_coordinates;

#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use crate::core::system::system_order::SessionSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;

#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<logging::SimLogState>().add_systems(
            Update,
            (
                logging::sim_logging_system,
                gizmos::draw_goal_gizmo,
                gizmos::draw_fall_plane_gizmo,
                gizmos::draw_track_bounds_gizmo,
            )
                .after(SessionSet::Simulate),
        );
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
