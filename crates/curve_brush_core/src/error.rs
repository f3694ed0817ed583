// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the brush engine.

use crate::history::HistoryError;
use crate::settings::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

/// Brush engine errors
#[derive(Debug, Error)]
pub enum BrushError {
    /// `activate` called while the brush is running
    #[error("Brush is already active")]
    AlreadyActive,

    /// Invalid settings
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    /// History error
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// File access error
    #[error("Failed to access {path:?}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Result type for brush operations
pub type Result<T> = std::result::Result<T, BrushError>;
