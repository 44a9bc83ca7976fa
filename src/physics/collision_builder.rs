//! Turns loaded track geometry into static trimesh bodies.
//!
//! Vertices are baked into world space with the mesh's cumulative scene transform. The optional
//! per-mesh override then becomes the body's pose on top of that, so an override nudges the
//! collision surface without touching the rendered mesh.

use std::collections::HashMap;

use bevy::log::{info, warn};
use bevy::math::{Affine3A, EulerRot, Quat, Vec3};
use thiserror::Error;

use super::materials::MaterialId;
use super::world::{BodyPose, RigidBodyWorld, StaticBodyId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("mesh has no index buffer")]
    MissingIndices,
    #[error("mesh topology is not a triangle list")]
    NotTriangleList,
    #[error("index count {count} is not a multiple of 3")]
    PartialTriangle { count: usize },
    #[error("index buffer is empty")]
    EmptyIndices,
    #[error("index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error("vertex {vertex} is not finite")]
    NonFiniteVertex { vertex: usize },
    #[error("trimesh rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshTopology {
    #[default]
    TriangleList,
    Other,
}

/// Raw geometry of one track sub-mesh, as extracted from the loaded scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
    pub topology: MeshTopology,
}

impl TrackMesh {
    /// Checks the index buffer and groups it into triangles.
    pub fn triangles(&self) -> Result<Vec<[u32; 3]>, GeometryError> {
        if self.topology != MeshTopology::TriangleList {
            return Err(GeometryError::NotTriangleList);
        }
        let indices = self.indices.as_ref().ok_or(GeometryError::MissingIndices)?;
        if indices.is_empty() {
            return Err(GeometryError::EmptyIndices);
        }
        if indices.len() % 3 != 0 {
            return Err(GeometryError::PartialTriangle {
                count: indices.len(),
            });
        }
        Ok(indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect())
    }
}

/// A sub-mesh together with its cumulative transform from the scene root.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTrackMesh {
    pub mesh: TrackMesh,
    pub world_transform: Affine3A,
}

/// Per-mesh body pose, keyed by mesh name in the config. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshOverride {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl MeshOverride {
    pub fn pose(&self) -> BodyPose {
        BodyPose {
            translation: self.position,
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
        }
    }
}

/// Builds one static body from `mesh`. On error the world is left untouched.
pub fn build_static_body(
    world: &mut RigidBodyWorld,
    mesh: &TrackMesh,
    world_transform: &Affine3A,
    override_pose: Option<&MeshOverride>,
) -> Result<StaticBodyId, GeometryError> {
    let triangles = mesh.triangles()?;
    let vertices: Vec<Vec3> = mesh
        .positions
        .iter()
        .map(|p| world_transform.transform_point3(Vec3::from_array(*p)))
        .collect();
    let pose = override_pose.map(MeshOverride::pose).unwrap_or_default();
    world.add_static_trimesh(&mesh.name, &vertices, triangles, pose, MaterialId::TRACK)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBuildReport {
    pub built: Vec<(String, StaticBodyId)>,
    pub errors: Vec<(String, GeometryError)>,
}

impl TrackBuildReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builds a body for every sub-mesh of one scene traversal. A bad mesh is recorded and skipped;
/// its siblings are still built.
pub fn build_track_bodies(
    world: &mut RigidBodyWorld,
    meshes: &[PlacedTrackMesh],
    overrides: &HashMap<String, MeshOverride>,
) -> TrackBuildReport {
    let mut report = TrackBuildReport::default();
    for placed in meshes {
        let name = &placed.mesh.name;
        match build_static_body(
            world,
            &placed.mesh,
            &placed.world_transform,
            overrides.get(name),
        ) {
            Ok(id) => report.built.push((name.clone(), id)),
            Err(e) => {
                warn!(target: "track", "skipping mesh '{}': {}", name, e);
                report.errors.push((name.clone(), e));
            }
        }
    }
    info!(
        target: "track",
        "track bodies built={} skipped={} total_statics={}",
        report.built.len(),
        report.errors.len(),
        world.static_body_count()
    );
    report
}
