use bevy::prelude::*;

use crate::core::components::Ball;
use crate::core::config::GameConfig;

/// Lights and the ball's visual. The track mesh itself comes from the glTF scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_lighting, spawn_ball_visual));
    }
}

fn setup_lighting(mut commands: Commands, cfg: Res<GameConfig>) {
    let l = &cfg.lighting;
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: l.ambient_brightness,
        ..default()
    });
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: l.directional_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(l.directional_position.into()).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_ball_visual(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let b = &cfg.ball;
    let [r, g, bl] = b.color;
    commands.spawn((
        Name::new("Ball"),
        Ball,
        Mesh3d(meshes.add(Sphere::new(b.radius).mesh().uv(32, 18))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, bl),
            perceptual_roughness: 0.4,
            ..default()
        })),
        Transform::from_translation(b.spawn.into()),
    ));
}
