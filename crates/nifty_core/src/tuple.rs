//! Tuple representation.
//!
//! A tuple is one record produced by the pipeline under test. Values are kept
//! as optional strings: `None` stands for a null field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered record of scalar field values.
///
/// # Example
///
/// ```rust
/// use nifty_core::Tuple;
///
/// let tuple = Tuple::from_values(["1234", "Garbage"]);
/// assert_eq!(tuple.len(), 2);
/// assert_eq!(tuple.get(1), Some("Garbage"));
/// assert!(tuple.contains("1234"));
/// assert_eq!(tuple.to_string(), "(1234,Garbage)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple {
    fields: Vec<Option<String>>,
}

impl Tuple {
    /// Creates a tuple from raw, possibly null, field values.
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    /// Creates a tuple where every field is non-null.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }

    /// Returns the number of fields (the tuple width).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the tuple has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value at `index`, or `None` if it is null or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|v| v.as_deref())
    }

    /// Returns the raw field values.
    pub fn fields(&self) -> &[Option<String>] {
        &self.fields
    }

    /// Returns true if any field equals `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.position_of(value).is_some()
    }

    /// Returns the index of the first field equal to `value`.
    pub fn position_of(&self, value: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.as_deref() == Some(value))
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if let Some(value) = field {
                write!(f, "{value}")?;
            }
        }
        write!(f, ")")
    }
}

impl From<Vec<Option<String>>> for Tuple {
    fn from(fields: Vec<Option<String>>) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<&str>> for Tuple {
    fn from(values: Vec<&str>) -> Self {
        Self::from_values(values)
    }
}

impl FromIterator<Option<String>> for Tuple {
    fn from_iter<T: IntoIterator<Item = Option<String>>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_handles_nulls_and_out_of_range() {
        let tuple = Tuple::new(vec![Some("a".into()), None]);

        assert_eq!(tuple.get(0), Some("a"));
        assert_eq!(tuple.get(1), None);
        assert_eq!(tuple.get(5), None);
        assert_eq!(tuple.len(), 2);
    }

    #[test]
    fn test_position_of_returns_first_match() {
        let tuple = Tuple::from_values(["x", "y", "x"]);
        assert_eq!(tuple.position_of("x"), Some(0));
        assert_eq!(tuple.position_of("y"), Some(1));
        assert_eq!(tuple.position_of("z"), None);
    }

    #[test]
    fn test_null_never_contained() {
        let tuple = Tuple::new(vec![None]);
        assert!(!tuple.contains(""));
    }

    #[test]
    fn test_display_renders_nulls_as_empty() {
        let tuple = Tuple::new(vec![Some("1".into()), None, Some("3".into())]);
        assert_eq!(tuple.to_string(), "(1,,3)");
        assert_eq!(Tuple::default().to_string(), "()");
    }
}
