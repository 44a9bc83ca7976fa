use bevy::gltf::GltfAssetLabel;
use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::scene::{SceneInstanceReady, SceneRoot};

use crate::core::components::{TrackColliders, TrackRoot};
use crate::core::config::GameConfig;
use crate::gameplay::session::ActiveSession;
use crate::physics::{MeshTopology, PlacedTrackMesh, TrackBuildReport, TrackMesh};

/// Outcome of the most recent track load, for the HUD and debug overlays.
#[derive(Debug, Resource, Clone, Default)]
pub struct TrackStatus {
    pub loaded: bool,
    pub report: TrackBuildReport,
    /// Mesh entities whose `Mesh` asset could not be found.
    pub missing_assets: Vec<String>,
}

/// Spawns the track glTF scene and turns its meshes into static colliders once it is ready.
pub struct TrackLoaderPlugin;

impl Plugin for TrackLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackStatus>()
            .add_systems(PostStartup, spawn_track_scene);
    }
}

fn spawn_track_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<GameConfig>,
) {
    let path = cfg.track.model_path.clone();
    if path.trim().is_empty() {
        warn!(target: "track", "track.model_path empty; running without a track");
        return;
    }
    info!(target: "track", "loading track scene '{}'", path);
    commands
        .spawn((
            Name::new("Track"),
            TrackRoot,
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path))),
        ))
        .observe(on_track_scene_ready);
}

fn on_track_scene_ready(trigger: Trigger<SceneInstanceReady>, mut commands: Commands) {
    let root = trigger.target();
    commands.queue(move |world: &mut World| build_track_colliders(world, root));
}

/// Collects every mesh under `root` and hands them to the active session. Runs once per root.
pub fn build_track_colliders(world: &mut World, root: Entity) {
    if world.get::<TrackColliders>(root).is_some() {
        return;
    }
    let (meshes, missing_assets) = collect_track_meshes(world, root);
    for name in &missing_assets {
        warn!(target: "track", "mesh asset missing for '{}'; skipped", name);
    }
    let overrides = world
        .get_resource::<GameConfig>()
        .map(|c| c.track.mesh_overrides())
        .unwrap_or_default();
    let Some(mut session) = world.get_resource_mut::<ActiveSession>() else {
        warn!(target: "track", "track ready before the session exists; colliders not built");
        return;
    };
    let report = session.add_track_meshes(&meshes, &overrides);
    if let Ok(mut e) = world.get_entity_mut(root) {
        e.insert(TrackColliders);
    }
    world.insert_resource(TrackStatus {
        loaded: true,
        report,
        missing_assets,
    });
}

/// Depth-first walk from `root`, composing local transforms so the result does not depend on
/// transform propagation having run yet.
pub fn collect_track_meshes(world: &World, root: Entity) -> (Vec<PlacedTrackMesh>, Vec<String>) {
    let mut placed = Vec::new();
    let mut missing = Vec::new();
    let Some(assets) = world.get_resource::<Assets<Mesh>>() else {
        return (placed, missing);
    };
    let local = |e: Entity| {
        world
            .get::<Transform>(e)
            .map(Transform::compute_affine)
            .unwrap_or(Affine3A::IDENTITY)
    };
    let mut stack = vec![(root, None::<Entity>, local(root))];
    while let Some((entity, parent, affine)) = stack.pop() {
        if let Some(mesh3d) = world.get::<Mesh3d>(entity) {
            let name = mesh_key(world, entity, parent, placed.len() + missing.len());
            match assets.get(&mesh3d.0) {
                Some(mesh) => placed.push(PlacedTrackMesh {
                    mesh: track_mesh_from(name, mesh),
                    world_transform: affine,
                }),
                None => missing.push(name),
            }
        }
        if let Some(children) = world.get::<Children>(entity) {
            // Reversed so siblings pop in scene order.
            for child in children.to_vec().into_iter().rev() {
                stack.push((child, Some(entity), affine * local(child)));
            }
        }
    }
    (placed, missing)
}

/// Override key for a mesh entity: its node's name when the node holds a single primitive,
/// else the primitive's own name.
fn mesh_key(world: &World, entity: Entity, parent: Option<Entity>, index: usize) -> String {
    if let Some(p) = parent {
        let single = world
            .get::<Children>(p)
            .map(|c| {
                let siblings = c.to_vec();
                siblings.iter().filter(|e| world.get::<Mesh3d>(**e).is_some()).count() == 1
            })
            .unwrap_or(false);
        if single && world.get::<Mesh3d>(p).is_none() {
            if let Some(n) = world.get::<Name>(p) {
                return n.as_str().to_string();
            }
        }
    }
    world
        .get::<Name>(entity)
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|| format!("mesh{index}"))
}

/// Copies positions and indices out of a Bevy mesh.
pub fn track_mesh_from(name: String, mesh: &Mesh) -> TrackMesh {
    let positions = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(v)) => v.clone(),
        _ => Vec::new(),
    };
    let indices = mesh
        .indices()
        .map(|i| i.iter().map(|x| x as u32).collect::<Vec<_>>());
    let topology = if mesh.primitive_topology() == PrimitiveTopology::TriangleList {
        MeshTopology::TriangleList
    } else {
        MeshTopology::Other
    };
    TrackMesh {
        name,
        positions,
        indices,
        topology,
    }
}
