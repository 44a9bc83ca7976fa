pub mod plugin;
pub mod session;
pub mod state;
