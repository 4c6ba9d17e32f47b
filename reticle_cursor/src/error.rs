// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only construction-time failures are errors. Missing inputs, failed environment
//! raycasts and events without subscribers degrade silently inside a frame.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or feeding the cursor.
#[derive(Error, Debug)]
pub enum CursorError {
    /// A ray direction was zero-length or not finite, or its origin was not finite.
    #[error("degenerate ray: direction must be finite and non-zero")]
    DegenerateDirection,

    /// A required collaborator was not supplied at construction.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating a [`CursorConfig`](crate::config::CursorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing the config failed.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds an out-of-range value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
