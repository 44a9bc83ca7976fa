pub mod config;

pub use config::{
    BallConfig, CameraConfig, CameraMode, DebugConfig, FallConfig, GameConfig, GoalConfig,
    LightingConfig, MeshOverrideConfig, PhysicsConfig, TrackConfig, Vec3Def, WindowConfig,
};
