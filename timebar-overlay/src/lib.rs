//! Timebar Overlay Library
//!
//! This library turns a time bar layout into the drawable elements of each
//! frame of an image stack, and hands them to a host renderer.

pub mod planner;
pub mod renderer;

pub use planner::{
    DrawMode, FrameOverlay, OverlayElement, OverlayPlanner, PlacedOverlay, PlanScope, TIME_BAR_TAG,
};
pub use renderer::{apply, OverlayRenderer, RecordingRenderer};

/// Result type for timebar-overlay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for timebar-overlay operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Timebar core error: {0}")]
    Core(#[from] timebar_core::Error),

    #[error("Position outside the stack: channel {channel}, slice {slice}, frame {frame}")]
    PositionOutOfRange { channel: u32, slice: u32, frame: u32 },

    #[error("Renderer error: {0}")]
    Renderer(String),
}
