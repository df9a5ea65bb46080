//! # Nifty Core
//!
//! Core types for the Nifty tuple assertion harness.
//!
//! Nifty checks the output of a batch pipeline against an expected dataset.
//! This crate provides the building blocks used to describe that expectation:
//!
//! ## Key Concepts
//!
//! - **Tuple**: An ordered record of scalar values produced by the pipeline
//! - **FieldValidator**: A named predicate over one field value
//! - **TupleValidator**: An ordered group of field validators describing one expected row,
//!   optionally tagged with a selector used to locate the matching actual row
//! - **ValidationMode**: How expected rows are paired with actual rows
//!
//! ## Example
//!
//! ```rust
//! use nifty_core::{is_string, string, tuple, Tuple};
//!
//! let expected = tuple()
//!     .select("1234")
//!     .field(string("1234"))
//!     .field(is_string())
//!     .build();
//!
//! let actual = Tuple::from_values(["1234", "Garbage"]);
//! assert!(expected.matches(&actual).is_match());
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod tuple;
pub mod validator;

pub use builder::*;
pub use error::*;
pub use field::*;
pub use tuple::*;
pub use validator::*;
