//! Field validators.
//!
//! A field validator is a named predicate over a single field value. The
//! built-in validators cover exact equality, presence checks, patterns and
//! enumerations; ad-hoc checks go through [`predicate`].
//!
//! A failing predicate is a negative result, never an error.

use crate::{NiftyError, Result};
use regex::Regex;

/// Outcome of evaluating one field validator against one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the value was accepted
    pub ok: bool,
    /// Description of the expectation
    pub description: String,
}

/// Capability implemented by every field validator.
///
/// `value` is `None` when the actual field is null or absent from the tuple.
///
/// # Example
///
/// ```rust
/// use nifty_core::FieldValidator;
///
/// struct Numeric;
///
/// impl FieldValidator for Numeric {
///     fn description(&self) -> String {
///         "numeric()".to_string()
///     }
///
///     fn evaluate(&self, value: Option<&str>) -> bool {
///         value.is_some_and(|v| v.parse::<f64>().is_ok())
///     }
/// }
///
/// assert!(Numeric.matches(Some("12.5")).ok);
/// assert!(!Numeric.matches(None).ok);
/// ```
pub trait FieldValidator: Send + Sync {
    /// Human-readable description of the expected value.
    fn description(&self) -> String;

    /// Returns true if `value` is accepted.
    fn evaluate(&self, value: Option<&str>) -> bool;

    /// Evaluates `value` and pairs the outcome with the description.
    fn matches(&self, value: Option<&str>) -> MatchResult {
        MatchResult {
            ok: self.evaluate(value),
            description: self.description(),
        }
    }
}

impl FieldValidator for Box<dyn FieldValidator> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        (**self).evaluate(value)
    }
}

/// Accepts exactly one string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equals {
    expected: String,
}

impl Equals {
    /// Returns the expected value.
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl FieldValidator for Equals {
    fn description(&self) -> String {
        format!("string(\"{}\")", self.expected)
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        value == Some(self.expected.as_str())
    }
}

/// Accepts any non-null, non-empty value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsString;

impl FieldValidator for IsString {
    fn description(&self) -> String {
        "isString()".to_string()
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| !v.is_empty())
    }
}

/// Accepts non-null values matching a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl FieldValidator for Pattern {
    fn description(&self) -> String {
        format!("pattern(/{}/)", self.regex.as_str())
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.regex.is_match(v))
    }
}

/// Accepts one of a fixed set of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    values: Vec<String>,
}

impl FieldValidator for OneOf {
    fn description(&self) -> String {
        let quoted: Vec<String> = self.values.iter().map(|v| format!("\"{v}\"")).collect();
        format!("oneOf({})", quoted.join(", "))
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.values.iter().any(|allowed| allowed == v))
    }
}

/// Accepts every value, including nulls. Placeholder for interior columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Any;

impl FieldValidator for Any {
    fn description(&self) -> String {
        "any()".to_string()
    }

    fn evaluate(&self, _value: Option<&str>) -> bool {
        true
    }
}

/// Custom validator backed by a closure. Null values are rejected before
/// the closure is called.
pub struct Predicate<F> {
    description: String,
    predicate: F,
}

impl<F> FieldValidator for Predicate<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn description(&self) -> String {
        self.description.clone()
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| (self.predicate)(v))
    }
}

/// Validator accepting exactly `expected`.
pub fn string(expected: impl Into<String>) -> Equals {
    Equals {
        expected: expected.into(),
    }
}

/// Validator accepting any non-empty value.
pub fn is_string() -> IsString {
    IsString
}

/// Validator accepting values matching `pattern`.
///
/// # Errors
///
/// Returns [`NiftyError::InvalidPattern`] if the regex does not compile.
pub fn pattern(pattern: &str) -> Result<Pattern> {
    let regex = Regex::new(pattern).map_err(|e| NiftyError::invalid_pattern(pattern, e))?;
    Ok(Pattern { regex })
}

/// Validator accepting any of `values`.
pub fn one_of<I, S>(values: I) -> OneOf
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OneOf {
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// Validator accepting everything.
pub fn any() -> Any {
    Any
}

/// Custom validator with a description and a closure over the raw value.
///
/// ```rust
/// use nifty_core::{predicate, FieldValidator};
///
/// let even = predicate("even()", |v| v.parse::<i64>().is_ok_and(|n| n % 2 == 0));
/// assert!(even.evaluate(Some("42")));
/// assert!(!even.evaluate(Some("7")));
/// ```
pub fn predicate<F>(description: impl Into<String>, predicate: F) -> Predicate<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    Predicate {
        description: description.into(),
        predicate,
    }
}
