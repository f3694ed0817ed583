// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the replay host.

use curve_brush_core::BrushError;
use std::path::PathBuf;
use thiserror::Error;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Bad command line
    #[error("usage: curve-brush-replay <script.ron> [output.ron|output.json]")]
    Usage,

    /// File access error
    #[error("Failed to access {path:?}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Script parse error
    #[error("Script parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON output error
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Events must be in time order
    #[error("Event {index} at {at_ms} ms comes before the previous event at {previous_ms} ms")]
    OutOfOrder {
        /// Index of the offending event
        index: usize,
        /// Its timestamp
        at_ms: u64,
        /// Timestamp of the event before it
        previous_ms: u64,
    },

    /// Engine error
    #[error(transparent)]
    Brush(#[from] BrushError),
}

/// Result type for replay operations
pub type Result<T> = std::result::Result<T, ReplayError>;
