//! Error types for building validators.
//!
//! Mismatches between expected and actual data are never errors: they are
//! reported as data. The errors here are caller mistakes detected while
//! constructing validators or test inputs, and they fail fast.

use thiserror::Error;

/// Result type for Nifty construction operations.
pub type Result<T> = std::result::Result<T, NiftyError>;

/// Main error type for Nifty configuration failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NiftyError {
    /// A row with no values cannot be converted to delimited input
    #[error("Dataset row cannot be empty")]
    EmptyRow,

    /// Validation mode string not recognised
    #[error("Unknown validation mode: '{0}'")]
    UnknownMode(String),

    /// Dataset validator built without a mode
    #[error("No validation mode configured for dataset '{dataset}'")]
    MissingMode {
        /// Dataset alias
        dataset: String,
    },

    /// Tuple validator without selector in selector mode
    #[error("Tuple validator #{tuple} of dataset '{dataset}' has no selector")]
    MissingSelector {
        /// Dataset alias
        dataset: String,
        /// Position of the tuple validator
        tuple: usize,
    },

    /// Single mode requires exactly one tuple validator
    #[error("Dataset '{dataset}' in single mode expects exactly one tuple validator, got {count}")]
    SingleModeArity {
        /// Dataset alias
        dataset: String,
        /// Number of tuple validators configured
        count: usize,
    },

    /// Regex pattern failed to compile
    #[error("Invalid regex pattern '{pattern}': {error}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        error: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl NiftyError {
    /// Creates a new missing mode error.
    pub fn missing_mode(dataset: impl Into<String>) -> Self {
        Self::MissingMode {
            dataset: dataset.into(),
        }
    }

    /// Creates a new missing selector error.
    pub fn missing_selector(dataset: impl Into<String>, tuple: usize) -> Self {
        Self::MissingSelector {
            dataset: dataset.into(),
            tuple,
        }
    }

    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, error: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            error: error.to_string(),
        }
    }
}
