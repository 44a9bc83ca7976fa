pub mod loader;

pub use loader::{TrackLoaderPlugin, TrackStatus};
