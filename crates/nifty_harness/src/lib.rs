//! Script test harness for Nifty.
//!
//! This crate drives a data-flow script through an [`ExecutionEngine`],
//! replaces its inputs with test rows, and validates the content of its
//! aliases with a [`DataSetValidator`](nifty_validator::DataSetValidator).
//!
//! The engine lives in an explicit [`Session`] that the caller acquires,
//! passes to every script operation, and releases when done.
//!
//! # Example
//!
//! ```rust
//! use nifty_core::{string, tuple, ValidationMode};
//! use nifty_harness::{MemoryEngine, NiftyTest, Session, SessionConfig, Storage};
//! use nifty_validator::dataset;
//!
//! # fn main() -> nifty_harness::Result<()> {
//! let mut session = Session::acquire(SessionConfig::default(), MemoryEngine::new())?;
//!
//! let mut script = NiftyTest::from_lines(
//!     &mut session,
//!     [
//!         "ships = LOAD 'ships.csv' USING PigStorage(';') AS (kind:chararray, name:chararray);",
//!         "STORE ships INTO 'out';",
//!     ],
//! )?;
//!
//! script.input(&mut session, "ships", &["Starship;Enterprise"], &Storage::Csv)?;
//! script.execute(&mut session)?;
//!
//! let report = script.validate(
//!     &mut session,
//!     dataset("ships")
//!         .mode(ValidationMode::BySelector)
//!         .add(tuple().select("Starship").field(string("Enterprise"))),
//! )?;
//! assert!(report.is_valid());
//!
//! session.release();
//! # Ok(())
//! # }
//! ```

use nifty_core::NiftyError;
use thiserror::Error;

mod config;
mod engine;
mod params;
mod script;
mod session;

pub use config::{
    AliasOverrides, AliasOverridesBuilder, EXEC_TYPE_ENV, ExecType, SessionConfig,
    SessionConfigBuilder, Storage,
};
pub use engine::MemoryEngine;
pub use params::substitute;
pub use script::{NiftyTest, NiftyTestBuilder};
pub use session::{ExecutionEngine, Registration, Session};

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Error types for script sessions and execution.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The session's engine has already been stopped
    #[error("Execution session has been released")]
    SessionReleased,

    /// Alias not defined by the registered script
    #[error("Unknown alias: '{0}'")]
    UnknownAlias(String),

    /// The registered script stores nothing
    #[error("Script has no STORE statement")]
    NoStoredAlias,

    /// A `$parameter` had no value
    #[error("Undefined parameter: '{0}'")]
    UndefinedParameter(String),

    /// Test rows could not be staged
    #[error("Failed to stage input data: {0}")]
    Staging(String),

    /// Invalid session configuration
    #[error("Invalid session configuration: {0}")]
    Configuration(String),

    /// Engine-reported failure
    #[error("Execution engine error: {0}")]
    Engine(String),

    /// Script or argument file I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validator construction failure
    #[error(transparent)]
    Nifty(#[from] NiftyError),
}

impl HarnessError {
    /// Creates an engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        HarnessError::Engine(message.into())
    }
}
