//! Conversions between Bevy math types and the physics engine's nalgebra types.
//! Nothing outside `physics` should need nalgebra directly.

use bevy::math::{Quat, Vec3};
use bevy_rapier3d::rapier::prelude::*;

#[inline]
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
pub fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

#[inline]
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_rotation(q: Quat) -> Rotation<Real> {
    let q = q.normalize();
    Rotation::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_rotation(r: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

/// Pose from a translation and rotation.
pub fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation::from(to_vector(translation)),
        to_rotation(rotation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_round_trip_preserves_direction() {
        let q = Quat::from_euler(bevy::math::EulerRot::XYZ, 0.3, -1.2, 0.7);
        let back = from_rotation(&to_rotation(q));
        let a = q * Vec3::X;
        let b = back * Vec3::X;
        assert!((a - b).length() < 1e-5, "{a:?} vs {b:?}");
    }

    #[test]
    fn isometry_applies_translation_then_rotation() {
        let iso = to_isometry(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let p = iso * to_point(Vec3::X);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!((p.z - 2.0).abs() < 1e-5);
    }
}
