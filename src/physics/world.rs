use std::num::NonZeroUsize;

use bevy::log::{debug, info};
use bevy::math::{Quat, Vec3};
use bevy_rapier3d::rapier::prelude::*;

use super::broad_phase::NaiveBroadPhase;
use super::collision_builder::GeometryError;
use super::convert::{from_rotation, from_vector, to_isometry, to_point, to_vector};
use super::materials::{ContactMaterial, ContactMaterialTable, MaterialId};

/// Fixed world parameters. Nothing here changes after [`RigidBodyWorld::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    pub gravity: Vec3,
    pub timestep: f32,
    pub solver_iterations: usize,
    pub track_ball: ContactMaterial,
    pub default_material: ContactMaterial,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            timestep: 1.0 / 60.0,
            solver_iterations: 10,
            track_ball: ContactMaterial {
                friction: 10.0,
                restitution: 0.0,
            },
            default_material: ContactMaterial::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BallSettings {
    pub radius: f32,
    pub mass: f32,
    pub spawn: Vec3,
    pub ccd: bool,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: 0.5,
            mass: 20.0,
            spawn: Vec3::new(0.0, 15.0, 0.0),
            ccd: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Pose of a static body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Index into the [`StaticBodyArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaticBodyId(pub usize);

#[derive(Debug, Clone)]
pub struct StaticBodyRecord {
    pub name: String,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub triangles: usize,
    pub material: MaterialId,
}

/// Append-only list of static bodies. `len()` doubles as a version counter.
#[derive(Debug, Clone, Default)]
pub struct StaticBodyArena {
    records: Vec<StaticBodyRecord>,
}

impl StaticBodyArena {
    fn push(&mut self, record: StaticBodyRecord) -> StaticBodyId {
        self.records.push(record);
        StaticBodyId(self.records.len() - 1)
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn get(&self, id: StaticBodyId) -> Option<&StaticBodyRecord> {
        self.records.get(id.0)
    }
    pub fn iter(&self) -> impl Iterator<Item = (StaticBodyId, &StaticBodyRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (StaticBodyId(i), r))
    }
    pub fn total_triangles(&self) -> usize {
        self.records.iter().map(|r| r.triangles).sum()
    }
}

/// Rapier world holding one dynamic ball and any number of static trimesh bodies.
pub struct RigidBodyWorld {
    settings: WorldSettings,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: NaiveBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    materials: ContactMaterialTable,
    statics: StaticBodyArena,
    ball: Option<BallHandle>,
    steps: u64,
}

impl RigidBodyWorld {
    pub fn new(settings: WorldSettings) -> Self {
        let mut params = IntegrationParameters {
            dt: settings.timestep,
            ..Default::default()
        };
        if let Some(n) = NonZeroUsize::new(settings.solver_iterations) {
            params.num_solver_iterations = n;
        }
        let mut materials = ContactMaterialTable::with_default(settings.default_material);
        materials.insert(MaterialId::TRACK, MaterialId::BALL, settings.track_ball);
        Self {
            gravity: to_vector(settings.gravity),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: NaiveBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            materials,
            statics: StaticBodyArena::default(),
            ball: None,
            steps: 0,
            settings,
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn materials(&self) -> &ContactMaterialTable {
        &self.materials
    }

    /// Spawns the ball. A previously spawned ball is removed first so the world never holds two.
    pub fn spawn_ball(&mut self, ball: &BallSettings) -> BallHandle {
        if let Some(old) = self.ball.take() {
            debug!(target: "ball", "replacing existing ball");
            self.bodies.remove(
                old.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(ball.spawn))
            .can_sleep(false)
            .ccd_enabled(ball.ccd)
            .build();
        let body = self.bodies.insert(body);
        let base = self.materials.get(MaterialId::BALL, MaterialId::BALL);
        let collider = ColliderBuilder::ball(ball.radius)
            .mass(ball.mass)
            .friction(base.friction)
            .restitution(base.restitution)
            .user_data(MaterialId::BALL.to_user_data())
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        let handle = BallHandle { body, collider };
        self.ball = Some(handle);
        info!(
            target: "ball",
            "ball spawned at ({:.2}, {:.2}, {:.2}) r={} m={} ccd={}",
            ball.spawn.x, ball.spawn.y, ball.spawn.z, ball.radius, ball.mass, ball.ccd
        );
        handle
    }

    pub fn ball(&self) -> Option<BallHandle> {
        self.ball
    }

    /// Adds a fixed trimesh body. Vertices are in the body's local frame; `pose` places the body.
    pub fn add_static_trimesh(
        &mut self,
        name: &str,
        vertices: &[Vec3],
        triangles: Vec<[u32; 3]>,
        pose: BodyPose,
        material: MaterialId,
    ) -> Result<StaticBodyId, GeometryError> {
        if triangles.is_empty() {
            return Err(GeometryError::EmptyIndices);
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteVertex { vertex: i });
        }
        let count = vertices.len();
        if let Some(index) = triangles
            .iter()
            .flat_map(|t| t.iter())
            .find(|&&i| i as usize >= count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index: *index,
                vertices: count,
            });
        }
        let triangle_count = triangles.len();
        let points = vertices.iter().map(|v| to_point(*v)).collect::<Vec<_>>();
        let base = self.materials.get(material, material);
        let collider = ColliderBuilder::trimesh(points, triangles)
            .map_err(|e| GeometryError::Rejected(e.to_string()))?
            .friction(base.friction)
            .restitution(base.restitution)
            .user_data(material.to_user_data())
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        let body = RigidBodyBuilder::fixed()
            .position(to_isometry(pose.translation, pose.rotation))
            .build();
        let body = self.bodies.insert(body);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        let id = self.statics.push(StaticBodyRecord {
            name: name.to_string(),
            body,
            collider,
            triangles: triangle_count,
            material,
        });
        debug!(
            target: "track",
            "static body '{}' #{} triangles={}",
            name, id.0, triangle_count
        );
        Ok(id)
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &self.materials,
            &(),
        );
        self.steps += 1;
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn timestep(&self) -> f32 {
        self.params.dt
    }

    fn ball_body(&self) -> Option<&RigidBody> {
        self.ball.and_then(|b| self.bodies.get(b.body))
    }

    pub fn ball_position(&self) -> Option<Vec3> {
        self.ball_body().map(|b| from_vector(b.translation()))
    }

    pub fn ball_rotation(&self) -> Option<Quat> {
        self.ball_body().map(|b| from_rotation(b.rotation()))
    }

    pub fn ball_linvel(&self) -> Option<Vec3> {
        self.ball_body().map(|b| from_vector(b.linvel()))
    }

    pub fn ball_angvel(&self) -> Option<Vec3> {
        self.ball_body().map(|b| from_vector(b.angvel()))
    }

    /// Returns `false` when there is no ball.
    pub fn set_ball_linvel(&mut self, velocity: Vec3) -> bool {
        let Some(handle) = self.ball else {
            return false;
        };
        match self.bodies.get_mut(handle.body) {
            Some(body) => {
                body.set_linvel(to_vector(velocity), true);
                true
            }
            None => false,
        }
    }

    pub fn static_body_count(&self) -> usize {
        self.statics.len()
    }

    pub fn statics(&self) -> &StaticBodyArena {
        &self.statics
    }

    /// World-space AABB of a static body, for debug drawing.
    pub fn static_bounds(&self, id: StaticBodyId) -> Option<(Vec3, Vec3)> {
        let record = self.statics.get(id)?;
        let aabb = self.colliders.get(record.collider)?.compute_aabb();
        Some((from_vector(&aabb.mins.coords), from_vector(&aabb.maxs.coords)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_floor(world: &mut RigidBodyWorld) -> StaticBodyId {
        let verts = [
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, -10.0),
        ];
        world
            .add_static_trimesh(
                "floor",
                &verts,
                vec![[0, 1, 2]],
                BodyPose::default(),
                MaterialId::TRACK,
            )
            .expect("valid triangle")
    }

    #[test]
    fn defaults_match_track_setup() {
        let world = RigidBodyWorld::new(WorldSettings::default());
        assert!((world.timestep() - 1.0 / 60.0).abs() < 1e-7);
        let m = world.materials().get(MaterialId::BALL, MaterialId::TRACK);
        assert_eq!(m.friction, 10.0);
        assert_eq!(m.restitution, 0.0);
    }

    #[test]
    fn spawning_twice_keeps_one_ball() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        let first = world.spawn_ball(&BallSettings::default());
        let second = world.spawn_ball(&BallSettings {
            spawn: Vec3::new(1.0, 2.0, 3.0),
            ..Default::default()
        });
        assert_ne!(first, second);
        assert_eq!(world.ball(), Some(second));
        assert_eq!(world.ball_position(), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn ball_falls_under_gravity() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        world.spawn_ball(&BallSettings::default());
        for _ in 0..10 {
            world.step();
        }
        let p = world.ball_position().unwrap();
        let v = world.ball_linvel().unwrap();
        assert!(p.y < 15.0);
        assert!(v.y < 0.0);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.z, 0.0);
        assert_eq!(world.steps(), 10);
    }

    #[test]
    fn rejects_out_of_range_index_without_adding_body() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        let verts = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let err = world
            .add_static_trimesh(
                "bad",
                &verts,
                vec![[0, 1, 3]],
                BodyPose::default(),
                MaterialId::TRACK,
            )
            .unwrap_err();
        assert_eq!(err, GeometryError::IndexOutOfRange { index: 3, vertices: 3 });
        assert_eq!(world.static_body_count(), 0);
    }

    #[test]
    fn rejects_non_finite_vertex() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        let verts = [Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Z];
        let err = world
            .add_static_trimesh(
                "nan",
                &verts,
                vec![[0, 1, 2]],
                BodyPose::default(),
                MaterialId::TRACK,
            )
            .unwrap_err();
        assert_eq!(err, GeometryError::NonFiniteVertex { vertex: 1 });
    }

    #[test]
    fn static_pose_moves_bounds() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        let verts = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let id = world
            .add_static_trimesh(
                "lifted",
                &verts,
                vec![[0, 1, 2]],
                BodyPose {
                    translation: Vec3::new(0.0, 5.0, 0.0),
                    rotation: Quat::IDENTITY,
                },
                MaterialId::TRACK,
            )
            .unwrap();
        let (min, max) = world.static_bounds(id).unwrap();
        assert!((min.y - 5.0).abs() < 1e-4);
        assert!((max.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn ball_comes_to_rest_on_floor() {
        let mut world = RigidBodyWorld::new(WorldSettings::default());
        flat_floor(&mut world);
        world.spawn_ball(&BallSettings {
            spawn: Vec3::new(0.0, 2.0, 0.0),
            ..Default::default()
        });
        for _ in 0..240 {
            world.step();
        }
        let p = world.ball_position().unwrap();
        let v = world.ball_linvel().unwrap();
        assert!((p.y - 0.5).abs() < 0.05, "resting height {}", p.y);
        assert!(v.y.abs() < 0.05, "vertical velocity {}", v.y);
    }
}
