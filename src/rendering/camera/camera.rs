use bevy::prelude::*;

use crate::core::components::FollowCamera;
use crate::core::config::{CameraConfig, CameraMode, GameConfig};
use crate::core::system::system_order::SessionSet;
use crate::gameplay::session::ActiveSession;

/// Follow parameters resolved at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FollowRig {
    pub mode: CameraMode,
    pub follow: Vec3,
    /// Camera minus spawn point, captured once for `Offset` mode.
    pub offset: Vec3,
}

impl FollowRig {
    pub fn from_config(cam: &CameraConfig, spawn: Vec3) -> Self {
        Self {
            mode: cam.mode,
            follow: cam.follow.into(),
            offset: Vec3::from(cam.initial_position) - spawn,
        }
    }

    /// Camera position for a ball at `ball`. The camera always looks at the ball.
    pub fn eye(&self, ball: Vec3) -> Vec3 {
        match self.mode {
            CameraMode::FixedHeight => {
                Vec3::new(ball.x + self.follow.x, self.follow.y, ball.z + self.follow.z)
            }
            CameraMode::Offset => ball + self.offset,
        }
    }

    pub fn placement(&self, ball: Vec3) -> Transform {
        Transform::from_translation(self.eye(ball)).looking_at(ball, Vec3::Y)
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, follow_ball.in_set(SessionSet::Present));
    }
}

fn setup_camera(mut commands: Commands, cfg: Res<GameConfig>) {
    let cam = &cfg.camera;
    let rig = FollowRig::from_config(cam, cfg.ball.spawn.into());
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: cam.fov_degrees.to_radians(),
            near: cam.near,
            far: cam.far,
            ..default()
        }),
        Transform::from_translation(cam.initial_position.into()).looking_at(Vec3::ZERO, Vec3::Y),
        FollowCamera,
    ));
    commands.insert_resource(rig);
}

fn follow_ball(
    rig: Option<Res<FollowRig>>,
    session: Option<Res<ActiveSession>>,
    mut q: Query<&mut Transform, With<FollowCamera>>,
) {
    let (Some(rig), Some(session)) = (rig, session) else {
        return;
    };
    let placement = rig.placement(session.ball_position());
    for mut tf in &mut q {
        *tf = placement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Vec3Def;

    #[test]
    fn fixed_height_tracks_xz_only() {
        let rig = FollowRig::from_config(&CameraConfig::default(), Vec3::new(0.0, 15.0, 0.0));
        assert_eq!(rig.eye(Vec3::new(1.0, 3.0, 2.0)), Vec3::new(7.0, 15.0, -6.0));
        assert_eq!(rig.eye(Vec3::new(1.0, -30.0, 2.0)).y, 15.0);
    }

    #[test]
    fn offset_mode_keeps_initial_offset() {
        let cam = CameraConfig {
            mode: CameraMode::Offset,
            initial_position: Vec3Def::new(8.0, 17.0, -10.0),
            ..Default::default()
        };
        let rig = FollowRig::from_config(&cam, Vec3::new(0.0, 15.0, 0.0));
        assert_eq!(rig.offset, Vec3::new(8.0, 2.0, -10.0));
        assert_eq!(rig.eye(Vec3::new(1.0, 0.0, 1.0)), Vec3::new(9.0, 2.0, -9.0));
    }

    #[test]
    fn placement_looks_at_ball() {
        let rig = FollowRig::from_config(&CameraConfig::default(), Vec3::ZERO);
        let ball = Vec3::new(3.0, 1.0, 4.0);
        let tf = rig.placement(ball);
        let dir = (ball - tf.translation).normalize();
        assert!((tf.forward().as_vec3() - dir).length() < 1e-5);
    }
}
