//! # TD Development Tools
//!
//! Command-line tools for development:
//! - Configuration validators
//! - Unlock-order inspection
//! - Headless auto-typist runs for balance checks

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod simulate;
pub mod validate;

use thiserror::Error;

/// Errors raised by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A file or directory could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration was rejected by the simulation core.
    #[error(transparent)]
    Config(#[from] td_core::error::GameError),

    /// A report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tool result type.
pub type Result<T> = std::result::Result<T, ToolError>;
