use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::{fs, path::Path};

use crate::gameplay::state::{FallPlane, GoalRegion};
use crate::physics::{BallSettings, ContactMaterial, MeshOverride, WorldSettings};

/// Serde-side 3D vector: `(x: 0.0, y: 15.0, z: 0.0)` in RON.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Vec3Def {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl Vec3Def {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
impl From<Vec3Def> for Vec3 {
    fn from(v: Vec3Def) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Track Roller".into(),
        }
    }
}

/// Per-mesh collision pose. Rotation is Euler XYZ in radians.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct MeshOverrideConfig {
    pub position: Vec3Def,
    pub rotation: Vec3Def,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrackConfig {
    /// Asset path of the track glTF, relative to `assets/`.
    pub model_path: String,
    /// Keyed by mesh name as it appears in the glTF.
    pub overrides: HashMap<String, MeshOverrideConfig>,
}
impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            model_path: "models/track.gltf".into(),
            overrides: HashMap::new(),
        }
    }
}
impl TrackConfig {
    pub fn mesh_overrides(&self) -> HashMap<String, MeshOverride> {
        self.overrides
            .iter()
            .map(|(name, o)| {
                (
                    name.clone(),
                    MeshOverride {
                        position: o.position.into(),
                        rotation: o.rotation.into(),
                    },
                )
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3Def,
    pub timestep: f32,
    pub solver_iterations: usize,
    pub max_steps_per_frame: u32,
    pub track_friction: f32,
    pub track_restitution: f32,
    pub default_friction: f32,
    pub default_restitution: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3Def::new(0.0, -9.82, 0.0),
            timestep: 1.0 / 60.0,
            solver_iterations: 10,
            max_steps_per_frame: 5,
            track_friction: 10.0,
            track_restitution: 0.0,
            default_friction: 0.3,
            default_restitution: 0.0,
        }
    }
}
impl PhysicsConfig {
    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            gravity: self.gravity.into(),
            timestep: self.timestep,
            solver_iterations: self.solver_iterations,
            track_ball: ContactMaterial {
                friction: self.track_friction,
                restitution: self.track_restitution,
            },
            default_material: ContactMaterial {
                friction: self.default_friction,
                restitution: self.default_restitution,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    pub spawn: Vec3Def,
    pub ccd: bool,
    pub color: [f32; 3],
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            mass: 20.0,
            spawn: Vec3Def::new(0.0, 15.0, 0.0),
            ccd: true,
            color: [0.0, 0.47, 1.0],
        }
    }
}
impl BallConfig {
    pub fn settings(&self) -> BallSettings {
        BallSettings {
            radius: self.radius,
            mass: self.mass,
            spawn: self.spawn.into(),
            ccd: self.ccd,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GoalConfig {
    pub center: Vec3Def,
    pub half_extent: f32,
}
impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            center: Vec3Def::new(0.0, 1.0, 40.0),
            half_extent: 1.0,
        }
    }
}
impl GoalConfig {
    pub fn region(&self) -> GoalRegion {
        GoalRegion {
            center: self.center.into(),
            half_extent: self.half_extent,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FallConfig {
    pub normal: Vec3Def,
    pub offset: f32,
}
impl Default for FallConfig {
    fn default() -> Self {
        Self {
            normal: Vec3Def::new(0.0, 1.0, 0.0),
            offset: -10.0,
        }
    }
}
impl FallConfig {
    pub fn plane(&self) -> FallPlane {
        FallPlane::new(self.normal.into(), self.offset)
    }
}

/// Written as a string (`mode: "Offset"`) so it survives the `ron::Value` layer merge, which
/// drops bare variant names.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum CameraMode {
    /// Fixed world height, horizontally offset from the ball.
    #[default]
    FixedHeight,
    /// Keeps the initial camera-to-spawn offset for the whole run.
    Offset,
}

impl TryFrom<String> for CameraMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "FixedHeight" => Ok(Self::FixedHeight),
            "Offset" => Ok(Self::Offset),
            other => Err(format!("unknown camera mode '{other}' (FixedHeight | Offset)")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    /// FixedHeight: `x` and `z` are offsets from the ball, `y` is an absolute height.
    pub follow: Vec3Def,
    /// Camera position before the first frame; also the reference for `Offset` mode.
    pub initial_position: Vec3Def,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::FixedHeight,
            follow: Vec3Def::new(6.0, 15.0, -8.0),
            initial_position: Vec3Def::new(16.0, 22.0, -26.0),
            fov_degrees: 45.0,
            near: 0.2,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub directional_position: Vec3Def,
    pub directional_illuminance: f32,
    pub ambient_brightness: f32,
}
impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            directional_position: Vec3Def::new(10.0, 10.0, 10.0),
            directional_illuminance: 8_000.0,
            ambient_brightness: 400.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Seconds between SIM log lines; 0 disables.
    pub sim_log_interval: f32,
    pub draw_goal: bool,
    pub draw_fall_plane: bool,
    pub draw_track_bounds: bool,
}
impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            sim_log_interval: 1.0,
            draw_goal: true,
            draw_fall_plane: false,
            draw_track_bounds: false,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub track: TrackConfig,
    pub physics: PhysicsConfig,
    pub ball: BallConfig,
    pub goal: GoalConfig,
    pub fall: FallConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub debug: DebugConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        Self::from_ron_str(&data)
    }
    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Reads each path in order and merges later files over earlier ones, map by map.
    /// Returns the config, the paths actually used, and any read/parse errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(ev, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        if let Some(val) = merged {
            match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (GameConfig::default(), used, errors)
                }
            }
        } else {
            (GameConfig::default(), used, errors)
        }
    }
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.track.model_path.trim().is_empty() {
            w.push("track.model_path is empty; no track will load".into());
        }
        for (name, o) in &self.track.overrides {
            if !o.position.is_finite() || !o.rotation.is_finite() {
                w.push(format!("track.overrides['{name}'] has non-finite values"));
            }
        }
        let g: Vec3 = self.physics.gravity.into();
        if !g.is_finite() {
            w.push("physics.gravity must be finite".into());
        } else if g.length() < 1e-4 {
            w.push("physics.gravity magnitude near zero; ball will float".into());
        } else if g.y > 0.0 {
            w.push(format!(
                "physics.gravity.y is positive ({}); typical configs use negative for downward",
                g.y
            ));
        }
        if !(self.physics.timestep > 0.0 && self.physics.timestep <= 0.1) {
            w.push(format!(
                "physics.timestep {} outside (0, 0.1]",
                self.physics.timestep
            ));
        }
        if self.physics.solver_iterations == 0 {
            w.push("physics.solver_iterations is 0 -> engine default used".into());
        }
        if self.physics.max_steps_per_frame == 0 {
            w.push("physics.max_steps_per_frame is 0 -> treated as 1".into());
        }
        if self.physics.track_friction < 0.0 || self.physics.default_friction < 0.0 {
            w.push("physics friction coefficients must be >= 0".into());
        }
        if !(0.0..=1.0).contains(&self.physics.track_restitution)
            || !(0.0..=1.0).contains(&self.physics.default_restitution)
        {
            w.push("physics restitution outside 0..1".into());
        }
        if self.ball.radius <= 0.0 {
            w.push("ball.radius must be > 0".into());
        }
        if self.ball.mass <= 0.0 {
            w.push("ball.mass must be > 0".into());
        }
        if self.goal.half_extent <= 0.0 {
            w.push("goal.half_extent must be > 0; goal unreachable".into());
        }
        let fall = self.fall.plane();
        let spawn: Vec3 = self.ball.spawn.into();
        let goal = self.goal.region();
        if Vec3::from(self.fall.normal).length_squared() < 1e-8 {
            w.push("fall.normal is zero -> +Y used".into());
        }
        if fall.has_fallen(spawn) {
            w.push("ball.spawn is already past the fall plane; run fails on first tick".into());
        }
        if goal.contains(spawn) {
            w.push("ball.spawn is inside the goal region; run passes on first tick".into());
        }
        if fall.has_fallen(goal.center) {
            w.push("goal.center lies past the fall plane".into());
        }
        if !(1.0..=170.0).contains(&self.camera.fov_degrees) {
            w.push(format!(
                "camera.fov_degrees {} outside 1..170",
                self.camera.fov_degrees
            ));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            w.push("camera clip planes must satisfy 0 < near < far".into());
        }
        if self.debug.sim_log_interval < 0.0 {
            w.push("debug.sim_log_interval negative -> treated as disabled".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_clean() {
        let w = GameConfig::default().validate();
        assert!(w.is_empty(), "{w:?}");
    }

    #[test]
    fn ball_defaults_to_blue() {
        let [r, g, b] = BallConfig::default().color;
        assert!(b > r && b > g, "{r} {g} {b}");
        assert_eq!([r, g, b], [0.0, 0.47, 1.0]);
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let cfg =
            GameConfig::from_ron_str(r#"(ball: (mass: 5.0), camera: (mode: "Offset"))"#).unwrap();
        assert_eq!(cfg.ball.mass, 5.0);
        assert_eq!(cfg.ball.radius, 0.5);
        assert_eq!(cfg.camera.mode, CameraMode::Offset);
        assert_eq!(cfg.physics, PhysicsConfig::default());
    }

    #[test]
    fn overrides_convert_to_mesh_overrides() {
        let cfg = GameConfig::from_ron_str(
            r#"(track: (overrides: { "Ramp": (position: (y: 2.0), rotation: (x: 0.5)) }))"#,
        )
        .unwrap();
        let o = cfg.track.mesh_overrides();
        assert_eq!(o["Ramp"].position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(o["Ramp"].rotation, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn invalid_values_warn() {
        let mut cfg = GameConfig::default();
        cfg.ball.radius = 0.0;
        cfg.goal.center = cfg.ball.spawn;
        cfg.physics.timestep = 0.0;
        let w = cfg.validate();
        assert!(w.iter().any(|m| m.contains("ball.radius")));
        assert!(w.iter().any(|m| m.contains("inside the goal")));
        assert!(w.iter().any(|m| m.contains("physics.timestep")));
    }

    #[test]
    fn world_settings_follow_physics_section() {
        let s = PhysicsConfig::default().world_settings();
        assert_eq!(s.gravity, Vec3::new(0.0, -9.82, 0.0));
        assert_eq!(s.solver_iterations, 10);
        assert_eq!(s.track_ball.friction, 10.0);
    }
}
