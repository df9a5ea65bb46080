//! # Nifty Validator
//!
//! Matching engine and reporting for the Nifty tuple assertion harness. This
//! crate compares an actual sequence of tuples against expected tuples:
//!
//! - Pairing expected and actual tuples (single row, by selector, by order)
//! - Field-by-field evaluation and mismatch collection
//! - Immutable [`DataSetReport`]s with per-tuple and per-field detail
//! - Text and JSON rendering of reports
//! - Helpers for building test inputs and expectations in bulk
//!
//! ## Example
//!
//! ```rust
//! use nifty_core::{is_string, tuple, Tuple, ValidationMode};
//! use nifty_validator::{dataset, format_report};
//!
//! let validator = dataset("result")
//!     .mode(ValidationMode::Single)
//!     .size(2)
//!     .add(tuple().field(is_string()).field(is_string()))
//!     .build()
//!     .expect("valid configuration");
//!
//! let report = validator.validate(vec![Tuple::from_values(["Garbage", "1234"])]);
//!
//! if report.is_valid() {
//!     println!("Validation passed!");
//! } else {
//!     println!("{}", format_report(&report));
//! }
//! ```

mod dataset;
mod engine;
mod report;
mod reporter;

pub use dataset::*;
pub use engine::*;
pub use report::{DataSetIssue, DataSetReport, ReportStats, TupleReport, TupleStatus};
pub use reporter::*;
