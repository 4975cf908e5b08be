// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for chordsmith.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the progression engine, model loading and export
#[derive(Debug, Error)]
pub enum ChordError {
    /// Genre string outside jazz / pop / rock
    #[error("unknown genre '{0}' (expected jazz, pop or rock)")]
    UnknownGenre(String),

    /// An operation needed at least one chord
    #[error("progression is empty")]
    EmptyProgression,

    /// A chord symbol without a recognizable root
    #[error("invalid chord symbol '{0}'")]
    InvalidChord(String),

    /// An external progression scorer failed
    #[error("scorer failed: {0}")]
    Scorer(String),

    /// Model artifacts missing or malformed
    #[error("failed to load model from {path:?}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for chordsmith operations
pub type Result<T> = std::result::Result<T, ChordError>;
