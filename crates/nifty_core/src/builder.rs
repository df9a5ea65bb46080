//! Builder pattern for creating tuple validators.
//!
//! This module provides the fluent entry point used by test code:
//!
//! ```rust
//! use nifty_core::{string, tuple};
//!
//! let validator = tuple().select("Battlestar").field(string("Galactica")).build();
//! assert_eq!(validator.selector(), Some("Battlestar"));
//! assert_eq!(validator.len(), 1);
//! ```

use crate::{FieldValidator, TupleValidator};
use std::fmt;

/// Builder for creating a [`TupleValidator`].
///
/// Field validators are kept in call order; the Nth call to `field`
/// describes the Nth field of the actual tuple.
#[derive(Default)]
pub struct TupleValidatorBuilder {
    fields: Vec<Box<dyn FieldValidator>>,
    selector: Option<String>,
}

impl TupleValidatorBuilder {
    /// Creates an empty tuple validator builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field validator.
    pub fn field(self, validator: impl FieldValidator + 'static) -> Self {
        self.boxed_field(Box::new(validator))
    }

    /// Appends an already boxed field validator.
    pub fn boxed_field(mut self, validator: Box<dyn FieldValidator>) -> Self {
        self.fields.push(validator);
        self
    }

    /// Sets the selector used to locate the actual tuple.
    pub fn select(mut self, key: impl Into<String>) -> Self {
        self.selector = Some(key.into());
        self
    }

    /// Returns the selector set so far.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Returns the number of field validators added so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field validators were added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds the tuple validator.
    pub fn build(self) -> TupleValidator {
        TupleValidator {
            fields: self.fields,
            selector: self.selector,
        }
    }
}

impl fmt::Debug for TupleValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|v| v.description()).collect();
        f.debug_struct("TupleValidatorBuilder")
            .field("selector", &self.selector)
            .field("fields", &fields)
            .finish()
    }
}

/// Starts a new tuple validator.
pub fn tuple() -> TupleValidatorBuilder {
    TupleValidatorBuilder::new()
}
