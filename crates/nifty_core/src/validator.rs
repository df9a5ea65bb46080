//! Tuple validators and matching modes.
//!
//! A [`TupleValidator`] describes one expected row as an ordered list of
//! field validators. Fields past the last configured validator are not
//! checked, so a tuple validator may describe a prefix of the row.

use crate::{FieldValidator, NiftyError, Tuple, TupleValidatorBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How tuple validators are paired with actual tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// One tuple validator against a dataset reduced to a single row
    Single,
    /// Each tuple validator locates its row through its selector value
    BySelector,
    /// The Nth tuple validator is paired with the Nth actual tuple
    ByOrder,
}

impl ValidationMode {
    /// Returns the canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Single => "single",
            ValidationMode::BySelector => "by_selector",
            ValidationMode::ByOrder => "by_order",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = NiftyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ValidationMode::Single),
            "by_selector" | "byselector" | "by-selector" => Ok(ValidationMode::BySelector),
            "by_order" | "byorder" | "by-order" => Ok(ValidationMode::ByOrder),
            _ => Err(NiftyError::UnknownMode(s.to_string())),
        }
    }
}

/// A field that failed its validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMismatch {
    /// Index of the field in the actual tuple
    pub index: usize,
    /// Description of the expected value
    pub expected: String,
    /// Actual value (`None` when null or absent)
    pub actual: Option<String>,
}

/// Result of matching one tuple validator against one actual tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TupleMatch {
    /// Number of field validators evaluated
    pub fields_checked: usize,
    /// Fields that were rejected
    pub mismatches: Vec<FieldMismatch>,
}

impl TupleMatch {
    /// Returns true if every checked field was accepted.
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Expected row: ordered field validators and an optional selector.
///
/// Built with [`crate::tuple`]; immutable afterwards.
pub struct TupleValidator {
    pub(crate) fields: Vec<Box<dyn FieldValidator>>,
    pub(crate) selector: Option<String>,
}

impl TupleValidator {
    /// Creates a new tuple validator builder.
    pub fn builder() -> TupleValidatorBuilder {
        TupleValidatorBuilder::new()
    }

    /// Returns the selector value, if any.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Returns the number of configured field validators.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field validators are configured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the descriptions of the field validators, in order.
    pub fn descriptions(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.description()).collect()
    }

    /// Matches field validator `i` against `actual[i]`.
    pub fn matches(&self, actual: &Tuple) -> TupleMatch {
        self.matches_from(actual, 0)
    }

    /// Matches field validator `i` against `actual[offset + i]`.
    ///
    /// Used when the leading fields of the actual tuple are a key that was
    /// already consumed to locate it.
    pub fn matches_from(&self, actual: &Tuple, offset: usize) -> TupleMatch {
        let mismatches = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                let index = offset + i;
                let value = actual.get(index);
                let result = field.matches(value);
                (!result.ok).then(|| FieldMismatch {
                    index,
                    expected: result.description,
                    actual: value.map(str::to_string),
                })
            })
            .collect();

        TupleMatch {
            fields_checked: self.fields.len(),
            mismatches,
        }
    }

    /// Locates the selector in `actual`, returning the key position.
    pub fn locate(&self, actual: &Tuple) -> Option<usize> {
        self.selector
            .as_deref()
            .and_then(|selector| actual.position_of(selector))
    }
}

impl fmt::Debug for TupleValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleValidator")
            .field("selector", &self.selector)
            .field("fields", &self.descriptions())
            .finish()
    }
}
