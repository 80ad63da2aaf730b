//! Error types for the typing-defense simulation.
//!
//! Only configuration problems are errors. Runtime mismatches (a wrong
//! keystroke, an unaffordable unlock) are reported through plain return
//! values and never surface here.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all simulation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A tech node names a prerequisite that does not exist.
    #[error("Tech node '{node}' requires missing prerequisite '{prereq}'")]
    MissingPrerequisite {
        /// Node declaring the prerequisite.
        node: String,
        /// The unknown prerequisite id.
        prereq: String,
    },

    /// The tech graph contains a cycle.
    #[error("Cycle detected at '{node}'")]
    CycleDetected {
        /// First node found on the cycle.
        node: String,
    },

    /// Two tech nodes share the same id.
    #[error("Duplicate tech node id '{0}'")]
    DuplicateNode(String),

    /// A producer was configured with no letters to draw from.
    #[error("Producer '{0}' has an empty letter pool")]
    EmptyLetterPool(String),

    /// A producer's word length range is unusable.
    #[error("Producer '{producer}' has invalid word length range {min}..={max}")]
    InvalidWordLength {
        /// Producer name.
        producer: String,
        /// Configured minimum length.
        min: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// Any other invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid simulation state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
