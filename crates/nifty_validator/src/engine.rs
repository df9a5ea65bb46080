//! Dataset matching engine.
//!
//! This module provides the [`DataSetValidator`] that pairs tuple validators
//! with actual tuples according to a [`ValidationMode`] and produces a
//! [`DataSetReport`].

use crate::report::{DataSetIssue, DataSetReport, ReportBuilder};
use nifty_core::{NiftyError, Result, Tuple, TupleValidator, TupleValidatorBuilder, ValidationMode};
use tracing::{debug, info, warn};

/// Validates an actual dataset against a list of tuple validators.
///
/// A dataset validator is single use: [`DataSetValidator::validate`] consumes
/// it together with the actual tuples.
///
/// # Example
///
/// ```rust
/// use nifty_core::{string, tuple, Tuple, ValidationMode};
/// use nifty_validator::dataset;
///
/// let validator = dataset("result")
///     .mode(ValidationMode::BySelector)
///     .size(2)
///     .add(tuple().select("1234").field(string("Garbage")))
///     .add(tuple().select("12345").field(string("Collector")))
///     .build()
///     .unwrap();
///
/// let actual = vec![
///     Tuple::from_values(["12345", "Collector"]),
///     Tuple::from_values(["1234", "Garbage"]),
/// ];
///
/// let report = validator.validate(actual);
/// assert!(report.is_valid());
/// ```
#[derive(Debug)]
pub struct DataSetValidator {
    name: String,
    mode: ValidationMode,
    expected_tuple_size: Option<usize>,
    tuples: Vec<TupleValidator>,
}

impl DataSetValidator {
    /// Creates a new dataset validator builder for the alias `name`.
    pub fn builder(name: impl Into<String>) -> DataSetValidatorBuilder {
        DataSetValidatorBuilder::new(name)
    }

    /// Returns the alias of the validated dataset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the matching mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Returns the declared tuple width.
    pub fn expected_tuple_size(&self) -> Option<usize> {
        self.expected_tuple_size
    }

    /// Returns the tuple validators.
    pub fn tuples(&self) -> &[TupleValidator] {
        &self.tuples
    }

    /// Validates the actual tuples.
    ///
    /// The sequence is read to exhaustion before any matching happens. This
    /// never fails: every discrepancy ends up in the returned report.
    pub fn validate<I>(self, actual: I) -> DataSetReport
    where
        I: IntoIterator<Item = Tuple>,
    {
        let actual: Vec<Tuple> = actual.into_iter().collect();

        info!(
            "Validating dataset '{}' ({} mode): {} tuple validator(s), {} actual tuple(s)",
            self.name,
            self.mode,
            self.tuples.len(),
            actual.len()
        );

        let mut report =
            ReportBuilder::new(&self.name, self.mode, self.expected_tuple_size, actual.len());

        self.check_widths(&actual, &mut report);

        match self.mode {
            ValidationMode::Single => self.match_single(&actual, &mut report),
            ValidationMode::BySelector => self.match_by_selector(&actual, &mut report),
            ValidationMode::ByOrder => self.match_by_order(&actual, &mut report),
        }

        let report = report.finish();

        info!(
            "Dataset '{}' is {}: {} field mismatch(es), {} issue(s)",
            report.name(),
            if report.is_valid() { "valid" } else { "invalid" },
            report.mismatch_count(),
            report.issues().len()
        );

        report
    }

    /// Records actual tuples whose width differs from the declared size.
    fn check_widths(&self, actual: &[Tuple], report: &mut ReportBuilder) {
        let Some(expected) = self.expected_tuple_size else {
            return;
        };

        for (position, tuple) in actual.iter().enumerate() {
            if tuple.len() != expected {
                warn!(
                    "Dataset '{}': tuple at position {} has {} field(s), declared size is {}",
                    self.name,
                    position,
                    tuple.len(),
                    expected
                );
                report.record_issue(DataSetIssue::TupleWidth {
                    position,
                    expected,
                    actual: tuple.len(),
                });
            }
        }
    }

    /// Single mode: the only tuple validator against the only actual tuple.
    fn match_single(&self, actual: &[Tuple], report: &mut ReportBuilder) {
        if actual.len() != 1 {
            report.record_issue(DataSetIssue::TupleCount {
                expected: 1,
                actual: actual.len(),
            });
        }

        for (index, validator) in self.tuples.iter().enumerate() {
            match actual.first() {
                Some(tuple) => {
                    report.record_match(index, validator.selector(), 0, tuple, validator.matches(tuple))
                }
                None => report.record_unmatched(index, validator.selector()),
            }
        }
    }

    /// BySelector mode: each tuple validator claims the first actual tuple
    /// containing its selector; fields after the selector are validated.
    fn match_by_selector(&self, actual: &[Tuple], report: &mut ReportBuilder) {
        let mut claimed = vec![false; actual.len()];

        for (index, validator) in self.tuples.iter().enumerate() {
            let selector = validator.selector();
            let located = actual
                .iter()
                .enumerate()
                .find_map(|(position, tuple)| validator.locate(tuple).map(|key| (position, key)));

            match located {
                Some((position, key)) => {
                    debug!(
                        "Selector {:?} found at position {} (key field {})",
                        selector, position, key
                    );
                    claimed[position] = true;
                    let tuple = &actual[position];
                    report.record_match(
                        index,
                        selector,
                        position,
                        tuple,
                        validator.matches_from(tuple, key + 1),
                    );
                }
                None => {
                    debug!("Selector {:?} not found in actual tuples", selector);
                    report.record_unmatched(index, selector);
                }
            }
        }

        let unclaimed = claimed.iter().filter(|c| !**c).count();
        if unclaimed > 0 {
            report.record_issue(DataSetIssue::UnclaimedTuples { count: unclaimed });
        }
    }

    /// ByOrder mode: strict positional pairing, selectors are ignored.
    fn match_by_order(&self, actual: &[Tuple], report: &mut ReportBuilder) {
        for (index, validator) in self.tuples.iter().enumerate() {
            match actual.get(index) {
                Some(tuple) => {
                    debug!("Tuple validator #{} paired with position {}", index, index);
                    report.record_match(
                        index,
                        validator.selector(),
                        index,
                        tuple,
                        validator.matches(tuple),
                    );
                }
                None => report.record_unmatched(index, validator.selector()),
            }
        }

        if actual.len() > self.tuples.len() {
            report.record_issue(DataSetIssue::UnclaimedTuples {
                count: actual.len() - self.tuples.len(),
            });
        }
    }
}

/// Builder for creating a [`DataSetValidator`].
#[derive(Debug, Default)]
pub struct DataSetValidatorBuilder {
    name: String,
    mode: Option<ValidationMode>,
    size: Option<usize>,
    tuples: Vec<TupleValidatorBuilder>,
}

impl DataSetValidatorBuilder {
    /// Creates a builder for the dataset alias `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the matching mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the declared width of actual tuples.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds an expected tuple.
    pub fn add(mut self, tuple: TupleValidatorBuilder) -> Self {
        self.tuples.push(tuple);
        self
    }

    /// Returns the dataset alias.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of expected tuples added so far.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true if no expected tuples were added.
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Builds the dataset validator.
    ///
    /// # Errors
    ///
    /// - [`NiftyError::MissingMode`] if no mode was set
    /// - [`NiftyError::SingleModeArity`] if single mode has other than one tuple
    /// - [`NiftyError::MissingSelector`] if a tuple lacks a selector in selector mode
    pub fn build(self) -> Result<DataSetValidator> {
        let mode = self
            .mode
            .ok_or_else(|| NiftyError::missing_mode(&self.name))?;

        match mode {
            ValidationMode::Single if self.tuples.len() != 1 => {
                return Err(NiftyError::SingleModeArity {
                    dataset: self.name,
                    count: self.tuples.len(),
                });
            }
            ValidationMode::BySelector => {
                if let Some(position) = self.tuples.iter().position(|t| t.selector().is_none()) {
                    return Err(NiftyError::missing_selector(self.name, position));
                }
            }
            _ => {}
        }

        Ok(DataSetValidator {
            name: self.name,
            mode,
            expected_tuple_size: self.size,
            tuples: self.tuples.into_iter().map(TupleValidatorBuilder::build).collect(),
        })
    }
}

/// Starts a new dataset validator for the alias `name`.
pub fn dataset(name: impl Into<String>) -> DataSetValidatorBuilder {
    DataSetValidatorBuilder::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TupleStatus;
    use nifty_core::{is_string, string, tuple};
    use pretty_assertions::assert_eq;

    fn t(values: &[&str]) -> Tuple {
        Tuple::from_values(values.iter().copied())
    }

    #[test]
    fn test_build_requires_mode() {
        let err = dataset("result").add(tuple()).build().unwrap_err();
        assert_eq!(err, NiftyError::missing_mode("result"));
    }

    #[test]
    fn test_single_mode_requires_one_tuple_validator() {
        let err = dataset("result")
            .mode(ValidationMode::Single)
            .add(tuple())
            .add(tuple())
            .build()
            .unwrap_err();
        assert!(matches!(err, NiftyError::SingleModeArity { count: 2, .. }));

        let err = dataset("result")
            .mode(ValidationMode::Single)
            .build()
            .unwrap_err();
        assert!(matches!(err, NiftyError::SingleModeArity { count: 0, .. }));
    }

    #[test]
    fn test_selector_mode_requires_selectors() {
        let err = dataset("result")
            .mode(ValidationMode::BySelector)
            .add(tuple().select("a"))
            .add(tuple().field(is_string()))
            .build()
            .unwrap_err();
        assert_eq!(err, NiftyError::missing_selector("result", 1));
    }

    #[test]
    fn test_by_order_accepts_tuples_without_selector() {
        let validator = dataset("result")
            .mode(ValidationMode::ByOrder)
            .add(tuple().field(is_string()))
            .build()
            .unwrap();
        assert_eq!(validator.tuples().len(), 1);
        assert_eq!(validator.mode(), ValidationMode::ByOrder);
    }

    #[test]
    fn test_single_valid() {
        let report = dataset("result")
            .mode(ValidationMode::Single)
            .add(tuple().field(is_string()).field(is_string()))
            .build()
            .unwrap()
            .validate(vec![t(&["Garbage", "1234"])]);

        assert!(report.is_valid());
        assert_eq!(report.tuples()[0].status, TupleStatus::Matched);
        assert_eq!(report.tuples()[0].position, Some(0));
    }

    #[test]
    fn test_single_with_no_tuples_is_unmatched() {
        let report = dataset("result")
            .mode(ValidationMode::Single)
            .add(tuple().field(is_string()))
            .build()
            .unwrap()
            .validate(Vec::new());

        assert!(!report.is_valid());
        assert_eq!(report.tuples()[0].status, TupleStatus::Unmatched);
        assert_eq!(
            report.issues(),
            &[DataSetIssue::TupleCount {
                expected: 1,
                actual: 0
            }]
        );
    }

    #[test]
    fn test_single_with_two_tuples_is_invalid_even_if_first_matches() {
        let report = dataset("result")
            .mode(ValidationMode::Single)
            .add(tuple().field(is_string()))
            .build()
            .unwrap()
            .validate(vec![t(&["a"]), t(&["b"])]);

        assert!(!report.is_valid());
        assert_eq!(report.tuples()[0].status, TupleStatus::Matched);
        assert_eq!(report.mismatch_count(), 0);
    }

    #[test]
    fn test_by_selector_validates_fields_after_key() {
        let report = dataset("result")
            .mode(ValidationMode::BySelector)
            .add(tuple().select("Galactica").field(string("1978")))
            .build()
            .unwrap()
            .validate(vec![t(&["Battlestar", "Galactica", "1978"])]);

        assert!(report.is_valid(), "{report:?}");
        assert_eq!(report.tuples()[0].position, Some(0));
    }

    #[test]
    fn test_by_selector_mismatch_reports_actual_index() {
        let report = dataset("result")
            .mode(ValidationMode::BySelector)
            .add(tuple().select("1234").field(string("Collector")))
            .build()
            .unwrap()
            .validate(vec![t(&["1234", "Garbage"])]);

        assert!(!report.is_valid());
        let mismatch = report.mismatch(0, 1).unwrap();
        assert_eq!(mismatch.expected, "string(\"Collector\")");
        assert_eq!(mismatch.actual.as_deref(), Some("Garbage"));
    }

    #[test]
    fn test_by_selector_ignores_unclaimed_tuples() {
        let report = dataset("result")
            .mode(ValidationMode::BySelector)
            .add(tuple().select("1234").field(string("Garbage")))
            .build()
            .unwrap()
            .validate(vec![t(&["Starship", "Enterprise"]), t(&["1234", "Garbage"])]);

        assert!(report.is_valid());
        assert_eq!(
            report.issues(),
            &[DataSetIssue::UnclaimedTuples { count: 1 }]
        );
    }

    #[test]
    fn test_by_order_pairs_positionally() {
        let report = dataset("result")
            .mode(ValidationMode::ByOrder)
            .add(tuple().field(string("a")))
            .add(tuple().field(string("b")))
            .build()
            .unwrap()
            .validate(vec![t(&["b"]), t(&["a"])]);

        assert!(!report.is_valid());
        assert_eq!(report.tuples()[0].status, TupleStatus::Mismatched);
        assert_eq!(report.tuples()[1].status, TupleStatus::Mismatched);
    }

    #[test]
    fn test_by_order_missing_actual_is_unmatched() {
        let report = dataset("result")
            .mode(ValidationMode::ByOrder)
            .add(tuple().field(string("a")))
            .add(tuple().field(string("b")))
            .build()
            .unwrap()
            .validate(vec![t(&["a"])]);

        assert!(!report.is_valid());
        assert_eq!(report.tuples()[1].status, TupleStatus::Unmatched);
    }

    #[test]
    fn test_width_mismatch_is_recorded_but_not_fatal() {
        let report = dataset("result")
            .mode(ValidationMode::ByOrder)
            .size(3)
            .add(tuple().field(string("a")))
            .build()
            .unwrap()
            .validate(vec![t(&["a", "b"])]);

        assert!(report.is_valid());
        assert_eq!(
            report.issues(),
            &[DataSetIssue::TupleWidth {
                position: 0,
                expected: 3,
                actual: 2
            }]
        );
    }

    #[test]
    fn test_empty_validator_list_is_vacuously_valid() {
        for mode in [ValidationMode::BySelector, ValidationMode::ByOrder] {
            let report = dataset("result")
                .mode(mode)
                .build()
                .unwrap()
                .validate(vec![t(&["a"])]);
            assert!(report.is_valid(), "{mode}");
        }
    }

    #[test]
    fn test_validate_consumes_lazy_iterator() {
        let rows = (0..3).map(|i| Tuple::from_values([i.to_string()]));
        let report = dataset("numbers")
            .mode(ValidationMode::ByOrder)
            .add(tuple().field(string("0")))
            .add(tuple().field(string("1")))
            .add(tuple().field(string("2")))
            .build()
            .unwrap()
            .validate(rows);

        assert!(report.is_valid());
        assert_eq!(report.stats().actual_tuples, 3);
        assert_eq!(report.stats().fields_checked, 3);
    }
}
