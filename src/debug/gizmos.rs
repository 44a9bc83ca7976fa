use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::gameplay::session::ActiveSession;

const GOAL_COLOR: Color = Color::srgb(0.2, 1.0, 0.4);
const FALL_COLOR: Color = Color::srgb(1.0, 0.3, 0.2);
const BOUNDS_COLOR: Color = Color::srgb(0.4, 0.6, 1.0);

pub fn draw_goal_gizmo(
    cfg: Res<GameConfig>,
    session: Option<Res<ActiveSession>>,
    mut gizmos: Gizmos,
) {
    if !cfg.debug.draw_goal {
        return;
    }
    let Some(session) = session else {
        return;
    };
    let goal = session.evaluator().goal();
    gizmos.cuboid(
        Transform::from_translation(goal.center).with_scale(Vec3::splat(goal.half_extent * 2.0)),
        GOAL_COLOR,
    );
}

/// Square patch of the fall plane under the ball.
pub fn draw_fall_plane_gizmo(
    cfg: Res<GameConfig>,
    session: Option<Res<ActiveSession>>,
    mut gizmos: Gizmos,
) {
    if !cfg.debug.draw_fall_plane {
        return;
    }
    let Some(session) = session else {
        return;
    };
    let plane = session.evaluator().fall_plane();
    let ball = session.ball_position();
    // Project the ball onto the plane.
    let center = ball - plane.normal * (ball.dot(plane.normal) - plane.offset);
    let rotation = Quat::from_rotation_arc(Vec3::Z, plane.normal);
    let isometry = Isometry3d::new(center, rotation);
    gizmos.rect(isometry, Vec2::splat(40.0), FALL_COLOR);
}

pub fn draw_track_bounds_gizmo(
    cfg: Res<GameConfig>,
    session: Option<Res<ActiveSession>>,
    mut gizmos: Gizmos,
) {
    if !cfg.debug.draw_track_bounds {
        return;
    }
    let Some(session) = session else {
        return;
    };
    let world = session.world();
    for (id, _) in world.statics().iter() {
        if let Some((min, max)) = world.static_bounds(id) {
            let size = (max - min).max(Vec3::splat(0.01));
            gizmos.cuboid(
                Transform::from_translation((min + max) * 0.5).with_scale(size),
                BOUNDS_COLOR,
            );
        }
    }
}
