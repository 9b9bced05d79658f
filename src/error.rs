//! Error types
//!
//! Environment failures (no GPU) and data-integrity problems are not errors
//! in this crate: the first becomes a fallback state, the second a logged
//! warning. What remains are file loading, configuration and backend
//! failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading graphs or configuration from disk
#[derive(Error, Debug)]
pub enum IoError {
    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(PathBuf),

    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The loaded configuration is not valid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for loading operations
pub type IoResult<T> = Result<T, IoError>;

/// Invalid engine configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Viewport width or height is zero
    #[error("viewport must be non-empty, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },

    /// Device pixel ratio is not a positive finite number
    #[error("device pixel ratio must be positive, got {0}")]
    InvalidPixelRatio(f32),

    /// Downgrade threshold is not below the upgrade threshold
    #[error("downgrade fps ({downgrade}) must be below upgrade fps ({upgrade})")]
    InvertedThresholds { downgrade: f32, upgrade: f32 },

    /// Sampling window is zero
    #[error("sampling window must be at least 1 ms")]
    EmptySampleWindow,

    /// Memory warning threshold is not below the critical threshold
    #[error("memory warning ({warning} MB) must be below memory critical ({critical} MB)")]
    InvertedMemoryThresholds { warning: f32, critical: f32 },

    /// Relationship opacity outside 0..=1
    #[error("edge base alpha must be within 0..=1, got {0}")]
    InvalidEdgeAlpha(f32),
}

/// Errors raised by a render backend while drawing a frame
#[derive(Error, Debug)]
pub enum RenderError {
    /// The frame holds more primitives than the backend buffers can take
    #[error("too many {kind}: {count} > {capacity}")]
    CapacityExceeded {
        kind: &'static str,
        count: usize,
        capacity: usize,
    },

    /// The GPU device reported a failure
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Errors surfaced by the engine frame loop
#[derive(Error, Debug)]
pub enum EngineError {
    /// The backend failed to draw the frame
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// The configuration passed at mount time is invalid
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
