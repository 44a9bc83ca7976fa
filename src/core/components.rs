use bevy::prelude::*;

/// Marker for the rendered ball. Its transform is copied from the simulation each frame.
#[derive(Component)]
pub struct Ball;

/// Camera driven by the follow rig.
#[derive(Component)]
pub struct FollowCamera;

/// Root entity of the spawned track scene.
#[derive(Component)]
pub struct TrackRoot;

/// Set once the track scene's meshes have been handed to the collision builder.
#[derive(Component)]
pub struct TrackColliders;
