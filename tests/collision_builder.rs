use bevy::math::{Affine3A, Quat, Vec3};
use std::collections::HashMap;
use track_roller::physics::{
    build_track_bodies, GeometryError, MeshOverride, MeshTopology, PlacedTrackMesh,
    RigidBodyWorld, TrackMesh, WorldSettings,
};

fn grid(name: &str, n: usize) -> TrackMesh {
    // n quads in a row along +x, two triangles each.
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    for i in 0..=n {
        positions.push([i as f32, 0.0, 0.0]);
        positions.push([i as f32, 0.0, 1.0]);
    }
    for i in 0..n as u32 {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }
    TrackMesh {
        name: name.into(),
        positions,
        indices: Some(indices),
        topology: MeshTopology::TriangleList,
    }
}

fn placed(mesh: TrackMesh, t: Affine3A) -> PlacedTrackMesh {
    PlacedTrackMesh {
        mesh,
        world_transform: t,
    }
}

#[test]
fn one_body_per_mesh_with_all_triangles_in_world_space() {
    let mut world = RigidBodyWorld::new(WorldSettings::default());
    let t = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::IDENTITY,
        Vec3::new(0.0, -1.0, 5.0),
    );
    let report = build_track_bodies(&mut world, &[placed(grid("Row", 4), t)], &HashMap::new());
    assert!(report.is_clean());
    assert_eq!(report.built.len(), 1);
    let (name, id) = &report.built[0];
    assert_eq!(name, "Row");
    assert_eq!(world.statics().get(*id).map(|r| r.triangles), Some(8));
    let (min, max) = world.static_bounds(*id).unwrap();
    assert!((min.x - 0.0).abs() < 1e-3 && (max.x - 8.0).abs() < 1e-3);
    assert!((min.z - 5.0).abs() < 1e-3 && (max.z - 7.0).abs() < 1e-3);
    assert!((min.y + 1.0).abs() < 1e-3);
}

#[test]
fn missing_indices_are_recorded_and_siblings_still_built() {
    let mut world = RigidBodyWorld::new(WorldSettings::default());
    let mut broken = grid("Broken", 2);
    broken.indices = None;
    let meshes = [
        placed(grid("Before", 1), Affine3A::IDENTITY),
        placed(broken, Affine3A::IDENTITY),
        placed(grid("After", 3), Affine3A::IDENTITY),
    ];
    let report = build_track_bodies(&mut world, &meshes, &HashMap::new());
    assert_eq!(
        report.errors,
        vec![("Broken".to_string(), GeometryError::MissingIndices)]
    );
    let names: Vec<_> = report.built.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["Before", "After"]);
    assert_eq!(world.static_body_count(), 2);
    assert_eq!(world.statics().total_triangles(), 2 + 6);
}

#[test]
fn override_moves_only_the_named_mesh() {
    let mut world = RigidBodyWorld::new(WorldSettings::default());
    let mut overrides = HashMap::new();
    overrides.insert(
        "Lifted".to_string(),
        MeshOverride {
            position: Vec3::new(0.0, 3.0, 0.0),
            rotation: Vec3::ZERO,
        },
    );
    let report = build_track_bodies(
        &mut world,
        &[
            placed(grid("Lifted", 1), Affine3A::IDENTITY),
            placed(grid("Plain", 1), Affine3A::IDENTITY),
        ],
        &overrides,
    );
    let lifted = world.static_bounds(report.built[0].1).unwrap();
    let plain = world.static_bounds(report.built[1].1).unwrap();
    assert!((lifted.0.y - 3.0).abs() < 1e-3);
    assert!(plain.0.y.abs() < 1e-3);
}

#[test]
fn out_of_range_index_is_an_error() {
    let mut world = RigidBodyWorld::new(WorldSettings::default());
    let mut bad = grid("Bad", 1);
    bad.indices = Some(vec![0, 1, 9]);
    let report =
        build_track_bodies(&mut world, &[placed(bad, Affine3A::IDENTITY)], &HashMap::new());
    assert!(matches!(
        report.errors[0].1,
        GeometryError::IndexOutOfRange { index: 9, .. }
    ));
    assert_eq!(world.static_body_count(), 0);
}
