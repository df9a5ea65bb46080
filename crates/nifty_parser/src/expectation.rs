//! Declarative expectation documents.

use nifty_core::{
    FieldValidator, Result, TupleValidatorBuilder, ValidationMode, any, is_string, one_of,
    pattern, string, tuple,
};
use nifty_validator::DataSetValidatorBuilder;
use serde::{Deserialize, Serialize};

/// Expected content of one dataset alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    /// Alias of the dataset under test
    pub dataset: String,

    /// Matching mode (`single`, `by_selector`, `by_order`)
    pub mode: String,

    /// Expected number of fields per actual tuple
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Expected tuples, in declaration order
    #[serde(default)]
    pub tuples: Vec<TupleSpec>,
}

/// One expected tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleSpec {
    /// Value locating the actual tuple in selector mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// A field check, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Exact string equality
    String { value: String },
    /// Any non-null, non-empty value
    IsString,
    /// Regex match
    Pattern { regex: String },
    /// Value in a fixed set
    OneOf { values: Vec<String> },
    /// Anything, including null
    Any,
}

impl FieldSpec {
    /// Builds the described field validator.
    ///
    /// # Errors
    ///
    /// Fails with `NiftyError::InvalidPattern` for a regex that does not compile.
    pub fn to_validator(&self) -> Result<Box<dyn FieldValidator>> {
        Ok(match self {
            FieldSpec::String { value } => Box::new(string(value.as_str())),
            FieldSpec::IsString => Box::new(is_string()),
            FieldSpec::Pattern { regex } => Box::new(pattern(regex)?),
            FieldSpec::OneOf { values } => Box::new(one_of(values.iter().map(String::as_str))),
            FieldSpec::Any => Box::new(any()),
        })
    }
}

impl TupleSpec {
    /// Builds the described tuple validator.
    pub fn to_builder(&self) -> Result<TupleValidatorBuilder> {
        let builder = match &self.select {
            Some(selector) => tuple().select(selector.as_str()),
            None => tuple(),
        };

        self.fields.iter().try_fold(builder, |builder, field| {
            Ok(builder.boxed_field(field.to_validator()?))
        })
    }
}

impl Expectation {
    /// Parses the mode string.
    pub fn validation_mode(&self) -> Result<ValidationMode> {
        self.mode.parse()
    }

    /// Converts into a dataset validator builder.
    ///
    /// Mode and pattern problems surface here; arity checks happen when the
    /// returned builder is built.
    pub fn to_builder(&self) -> Result<DataSetValidatorBuilder> {
        let mut builder = DataSetValidatorBuilder::new(self.dataset.as_str())
            .mode(self.validation_mode()?);

        if let Some(size) = self.size {
            builder = builder.size(size);
        }

        self.tuples.iter().try_fold(builder, |builder, spec| {
            Ok(builder.add(spec.to_builder()?))
        })
    }
}
