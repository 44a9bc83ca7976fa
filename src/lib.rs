pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::core::components::Ball;
pub use crate::core::config::{GameConfig, WindowConfig};
pub use crate::debug::format_coordinates;
pub use crate::gameplay::session::{ActiveSession, AdvanceReport, TrackSession};
pub use crate::gameplay::state::{GameOutcome, GameState};
pub use crate::interaction::input::InputController;
