//! Timebar Core Library
//!
//! This library provides the configuration model, the duration formatter and
//! the layout engine used to overlay a time-stamp bar (a progress bar plus an
//! elapsed-time label) onto every frame of an image stack.

pub mod config;
pub mod layout;
pub mod measure;
pub mod session;
pub mod stack;
pub mod store;
pub mod time_format;

pub use config::{Configuration, FontFamily, FontSpec, Location, NamedColor, Rgb};
pub use layout::{BoxSize, LayoutResult, Margins, Origin, Rect};
pub use measure::{AdvanceTableMeasure, TextMeasure};
pub use session::Session;
pub use stack::{RegionOfInterest, StackMetadata, StackPosition};
pub use store::{ConfigStore, MemoryStore};
#[cfg(feature = "serde")]
pub use store::JsonFileStore;
pub use time_format::{DurationTemplate, TimeFormatter, TimeUnit};

/// Result type for timebar-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for timebar-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Location is set to 'At Selection' but there is no selection on the image")]
    MissingAnchor,

    #[error("Unrecognized time unit: '{0}'")]
    UnrecognizedTimeUnit(String),

    #[error("Frame {frame} is outside the stack (1..={frame_count})")]
    InvalidFrame { frame: u32, frame_count: u32 },

    #[error("Unknown {kind}: '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
