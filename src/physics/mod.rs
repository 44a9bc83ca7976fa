pub mod broad_phase;
pub mod collision_builder;
pub mod convert;
pub mod materials;
pub mod stepper;
pub mod world;

pub use collision_builder::{
    build_static_body, build_track_bodies, GeometryError, MeshOverride, MeshTopology,
    PlacedTrackMesh, TrackBuildReport, TrackMesh,
};
pub use materials::{ContactMaterial, ContactMaterialTable, MaterialId};
pub use stepper::FixedStepper;
pub use world::{
    BallHandle, BallSettings, BodyPose, RigidBodyWorld, StaticBodyArena, StaticBodyId,
    WorldSettings,
};
