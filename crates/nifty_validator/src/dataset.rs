//! Test data helpers.
//!
//! This module provides types for describing test input rows and expected
//! datasets in bulk, either as delimited rows or as column-keyed maps.

use crate::DataSetValidatorBuilder;
use nifty_core::{FieldValidator, NiftyError, Result, TupleValidatorBuilder, ValidationMode, tuple};
use std::collections::HashMap;
use tracing::info;

/// Ordered delimited input rows for one alias.
///
/// # Example
///
/// ```rust
/// use nifty_validator::TestDataSet;
///
/// let data = TestDataSet::new().add("1234;Garbage").add("12345;Collector");
/// assert_eq!(data.rows(), ["1234;Garbage", "12345;Collector"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestDataSet {
    rows: Vec<String>,
}

impl TestDataSet {
    /// Creates an empty test dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn add(mut self, row: impl Into<String>) -> Self {
        self.push(row);
        self
    }

    /// Appends a row in place.
    pub fn push(&mut self, row: impl Into<String>) {
        self.rows.push(row.into());
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TestDataSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Joins `values` with `delimiter`.
///
/// # Errors
///
/// Returns [`NiftyError::EmptyRow`] if `values` is empty.
pub fn join_row<S: AsRef<str>>(values: &[S], delimiter: &str) -> Result<String> {
    if values.is_empty() {
        return Err(NiftyError::EmptyRow);
    }

    Ok(values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(delimiter))
}

/// Input rows keyed by column name, with an explicit column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedDataset {
    schema: Vec<String>,
    tuples: Vec<HashMap<String, String>>,
}

impl MappedDataset {
    /// Creates a dataset with the given column order.
    pub fn new<I, S>(schema: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: schema.into_iter().map(Into::into).collect(),
            tuples: Vec::new(),
        }
    }

    /// Appends a row given as `(column, value)` pairs.
    pub fn add<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tuples.push(
            row.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Returns the column order.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Returns the rows.
    pub fn tuples(&self) -> &[HashMap<String, String>] {
        &self.tuples
    }

    /// Converts the rows to delimited strings in column order.
    ///
    /// Columns absent from a row become empty values.
    ///
    /// # Errors
    ///
    /// Returns [`NiftyError::EmptyRow`] if the schema has no columns and
    /// there is at least one row.
    pub fn to_test_dataset(&self, delimiter: &str) -> Result<TestDataSet> {
        self.tuples
            .iter()
            .map(|row| {
                let values: Vec<&str> = self
                    .schema
                    .iter()
                    .map(|col| row.get(col).map(String::as_str).unwrap_or_default())
                    .collect();
                join_row(&values, delimiter)
            })
            .collect()
    }
}

/// Expected tuples collected ahead of choosing the alias and mode.
#[derive(Debug, Default)]
pub struct ValidatedDataSet {
    tuples: Vec<TupleValidatorBuilder>,
}

impl ValidatedDataSet {
    /// Creates an empty expected dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an expected tuple.
    pub fn add(mut self, tuple: TupleValidatorBuilder) -> Self {
        self.tuples.push(tuple);
        self
    }

    /// Returns the expected tuples.
    pub fn tuples(&self) -> &[TupleValidatorBuilder] {
        &self.tuples
    }

    /// Converts into a dataset validator builder.
    pub fn into_builder(
        self,
        name: impl Into<String>,
        mode: ValidationMode,
        tuple_size: usize,
    ) -> DataSetValidatorBuilder {
        self.tuples.into_iter().fold(
            DataSetValidatorBuilder::new(name).mode(mode).size(tuple_size),
            DataSetValidatorBuilder::add,
        )
    }
}

/// Expected tuples keyed by column name, with an explicit column order.
///
/// A column with no validator in a row is left out of that row's tuple
/// validator; later validators move up to fill the gap.
#[derive(Default)]
pub struct ValidateMappedDataSet {
    schema: Vec<String>,
    tuples: Vec<HashMap<String, Box<dyn FieldValidator>>>,
}

impl ValidateMappedDataSet {
    /// Creates an expected dataset with the given column order.
    pub fn new<I, S>(schema: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: schema.into_iter().map(Into::into).collect(),
            tuples: Vec::new(),
        }
    }

    /// Appends a row of column validators.
    pub fn add(mut self, row: HashMap<String, Box<dyn FieldValidator>>) -> Self {
        self.tuples.push(row);
        self
    }

    /// Returns the column order.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Returns the number of expected rows.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true if there are no expected rows.
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Converts into a dataset validator builder.
    pub fn into_builder(
        self,
        name: impl Into<String>,
        mode: ValidationMode,
        tuple_size: usize,
    ) -> DataSetValidatorBuilder {
        info!("Size of valid dataset {}", self.tuples.len());
        info!("Tuple size defined {}", tuple_size);

        let schema = self.schema;
        self.tuples.into_iter().fold(
            DataSetValidatorBuilder::new(name).mode(mode).size(tuple_size),
            |builder, mut row| {
                let expected = schema
                    .iter()
                    .filter_map(|col| row.remove(col))
                    .fold(tuple(), TupleValidatorBuilder::boxed_field);
                builder.add(expected)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifty_core::{is_string, string, Tuple};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_row() {
        assert_eq!(join_row(&["a", "b", "c"], "|").unwrap(), "a|b|c");
        assert_eq!(join_row(&["only"], ";").unwrap(), "only");
    }

    #[test]
    fn test_join_empty_row_fails() {
        let empty: [&str; 0] = [];
        assert_eq!(join_row(&empty, "|").unwrap_err(), NiftyError::EmptyRow);
    }

    #[test]
    fn test_mapped_dataset_uses_schema_order() {
        let mapped = MappedDataset::new(["id", "name"])
            .add([("name", "Garbage"), ("id", "1234")])
            .add([("id", "12345")]);

        let data = mapped.to_test_dataset("|").unwrap();
        assert_eq!(data.rows(), ["1234|Garbage", "12345|"]);
    }

    #[test]
    fn test_mapped_dataset_with_empty_schema_fails() {
        let mapped = MappedDataset::new(Vec::<String>::new()).add([("id", "1")]);
        assert_eq!(mapped.to_test_dataset("|").unwrap_err(), NiftyError::EmptyRow);
    }

    #[test]
    fn test_validated_dataset_into_builder() {
        let expected = ValidatedDataSet::new()
            .add(tuple().select("1234").field(string("Garbage")))
            .add(tuple().select("12345").field(string("Collector")));
        assert_eq!(expected.tuples().len(), 2);

        let validator = expected
            .into_builder("result", ValidationMode::BySelector, 2)
            .build()
            .unwrap();

        assert_eq!(validator.name(), "result");
        assert_eq!(validator.expected_tuple_size(), Some(2));
        assert_eq!(validator.tuples().len(), 2);
    }

    #[test]
    fn test_validate_mapped_dataset_omits_missing_columns() {
        let mut first: HashMap<String, Box<dyn FieldValidator>> = HashMap::new();
        first.insert("id".into(), Box::new(string("1234")));
        first.insert("name".into(), Box::new(string("Garbage")));

        let mut second: HashMap<String, Box<dyn FieldValidator>> = HashMap::new();
        second.insert("name".into(), Box::new(is_string()));

        let expected = ValidateMappedDataSet::new(["id", "name"]).add(first).add(second);
        assert_eq!(expected.len(), 2);

        let validator = expected
            .into_builder("result", ValidationMode::ByOrder, 2)
            .build()
            .unwrap();

        assert_eq!(validator.tuples()[0].len(), 2);
        assert_eq!(validator.tuples()[1].len(), 1);
        assert_eq!(validator.tuples()[1].descriptions(), vec!["isString()"]);

        let report = validator.validate(vec![
            Tuple::from_values(["1234", "Garbage"]),
            Tuple::from_values(["12345", "Collector"]),
        ]);
        assert!(report.is_valid(), "{report:?}");
    }
}
