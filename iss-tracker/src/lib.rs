pub mod canvas;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod renderer;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::OpenNotifyClient;
pub use error::{ApiError, GraphicsError};
pub use orchestrator::{Tracker, TrackerReport};
pub use renderer::MapRenderer;
