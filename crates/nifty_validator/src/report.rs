//! Dataset validation reports.
//!
//! A [`DataSetReport`] is produced once per validation pass. The engine
//! accumulates results in a [`ReportBuilder`] and freezes them at the end;
//! the published report is read-only.

use nifty_core::{FieldMismatch, Tuple, TupleMatch, ValidationMode};
use serde::Serialize;
use std::fmt;

/// Outcome of one tuple validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TupleStatus {
    /// Paired with an actual tuple and every field accepted
    Matched,
    /// Paired with an actual tuple but some fields were rejected
    Mismatched,
    /// No actual tuple could be paired
    Unmatched,
}

impl TupleStatus {
    /// Returns the status label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            TupleStatus::Matched => "PASSED",
            TupleStatus::Mismatched => "FAILED",
            TupleStatus::Unmatched => "UNMATCHED",
        }
    }
}

/// Result for one tuple validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleReport {
    /// Position of the tuple validator in the dataset validator
    pub index: usize,
    /// Selector of the tuple validator, if any
    pub selector: Option<String>,
    /// Match outcome
    pub status: TupleStatus,
    /// Position of the paired tuple in the actual sequence
    pub position: Option<usize>,
    /// The paired actual tuple
    pub actual: Option<Tuple>,
    /// Rejected fields
    pub mismatches: Vec<FieldMismatch>,
}

impl TupleReport {
    /// Returns true if the tuple validator matched.
    pub fn is_match(&self) -> bool {
        self.status == TupleStatus::Matched
    }
}

/// Dataset-level discrepancy not tied to a single tuple validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSetIssue {
    /// Wrong number of actual tuples for the mode
    TupleCount {
        /// Expected number of tuples
        expected: usize,
        /// Actual number of tuples
        actual: usize,
    },

    /// An actual tuple does not have the declared width
    TupleWidth {
        /// Position in the actual sequence
        position: usize,
        /// Declared width
        expected: usize,
        /// Actual width
        actual: usize,
    },

    /// Actual tuples that no tuple validator was paired with
    UnclaimedTuples {
        /// Number of unclaimed tuples
        count: usize,
    },
}

impl DataSetIssue {
    /// Returns true if the issue makes the report invalid.
    pub fn invalidates(&self) -> bool {
        matches!(self, DataSetIssue::TupleCount { .. })
    }
}

impl fmt::Display for DataSetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSetIssue::TupleCount { expected, actual } => {
                write!(f, "expected {expected} actual tuple(s), got {actual}")
            }
            DataSetIssue::TupleWidth {
                position,
                expected,
                actual,
            } => write!(
                f,
                "actual tuple at position {position} has {actual} field(s), expected {expected}"
            ),
            DataSetIssue::UnclaimedTuples { count } => {
                write!(f, "{count} actual tuple(s) not claimed by any tuple validator")
            }
        }
    }
}

/// Statistics about a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Number of actual tuples read
    pub actual_tuples: usize,
    /// Number of tuple validators evaluated
    pub tuple_validators: usize,
    /// Number of field validators evaluated
    pub fields_checked: usize,
}

/// Immutable outcome of validating one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSetReport {
    name: String,
    mode: ValidationMode,
    expected_tuple_size: Option<usize>,
    valid: bool,
    tuples: Vec<TupleReport>,
    issues: Vec<DataSetIssue>,
    stats: ReportStats,
}

impl DataSetReport {
    /// Returns the dataset alias.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the matching mode used.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Returns the declared tuple width.
    pub fn expected_tuple_size(&self) -> Option<usize> {
        self.expected_tuple_size
    }

    /// Returns true if the actual dataset conforms.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns per-tuple-validator results, in configuration order.
    pub fn tuples(&self) -> &[TupleReport] {
        &self.tuples
    }

    /// Returns dataset-level issues.
    pub fn issues(&self) -> &[DataSetIssue] {
        &self.issues
    }

    /// Returns statistics about the pass.
    pub fn stats(&self) -> &ReportStats {
        &self.stats
    }

    /// Iterates over tuple results that did not match.
    pub fn failures(&self) -> impl Iterator<Item = &TupleReport> {
        self.tuples.iter().filter(|t| !t.is_match())
    }

    /// Looks up the mismatch for a tuple validator and actual field index.
    pub fn mismatch(&self, tuple: usize, field: usize) -> Option<&FieldMismatch> {
        self.tuples
            .get(tuple)?
            .mismatches
            .iter()
            .find(|m| m.index == field)
    }

    /// Total number of field mismatches.
    pub fn mismatch_count(&self) -> usize {
        self.tuples.iter().map(|t| t.mismatches.len()).sum()
    }

    /// Selectors of tuple validators that found no actual tuple.
    pub fn unmatched_selectors(&self) -> Vec<&str> {
        self.tuples
            .iter()
            .filter(|t| t.status == TupleStatus::Unmatched)
            .filter_map(|t| t.selector.as_deref())
            .collect()
    }
}

/// Accumulates results during a validation pass.
#[derive(Debug)]
pub(crate) struct ReportBuilder {
    name: String,
    mode: ValidationMode,
    expected_tuple_size: Option<usize>,
    tuples: Vec<TupleReport>,
    issues: Vec<DataSetIssue>,
    stats: ReportStats,
}

impl ReportBuilder {
    pub(crate) fn new(
        name: &str,
        mode: ValidationMode,
        expected_tuple_size: Option<usize>,
        actual_tuples: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            mode,
            expected_tuple_size,
            tuples: Vec::new(),
            issues: Vec::new(),
            stats: ReportStats {
                actual_tuples,
                ..Default::default()
            },
        }
    }

    /// Records a tuple validator paired with the actual tuple at `position`.
    pub(crate) fn record_match(
        &mut self,
        index: usize,
        selector: Option<&str>,
        position: usize,
        actual: &Tuple,
        result: TupleMatch,
    ) {
        let status = if result.is_match() {
            TupleStatus::Matched
        } else {
            TupleStatus::Mismatched
        };
        self.stats.tuple_validators += 1;
        self.stats.fields_checked += result.fields_checked;
        self.tuples.push(TupleReport {
            index,
            selector: selector.map(str::to_string),
            status,
            position: Some(position),
            actual: Some(actual.clone()),
            mismatches: result.mismatches,
        });
    }

    /// Records a tuple validator with no actual counterpart.
    pub(crate) fn record_unmatched(&mut self, index: usize, selector: Option<&str>) {
        self.stats.tuple_validators += 1;
        self.tuples.push(TupleReport {
            index,
            selector: selector.map(str::to_string),
            status: TupleStatus::Unmatched,
            position: None,
            actual: None,
            mismatches: Vec::new(),
        });
    }

    pub(crate) fn record_issue(&mut self, issue: DataSetIssue) {
        self.issues.push(issue);
    }

    /// Freezes the accumulated results.
    pub(crate) fn finish(self) -> DataSetReport {
        let valid = self.tuples.iter().all(TupleReport::is_match)
            && !self.issues.iter().any(DataSetIssue::invalidates);

        DataSetReport {
            name: self.name,
            mode: self.mode,
            expected_tuple_size: self.expected_tuple_size,
            valid,
            tuples: self.tuples,
            issues: self.issues,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mismatch(index: usize) -> FieldMismatch {
        FieldMismatch {
            index,
            expected: "string(\"x\")".to_string(),
            actual: Some("y".to_string()),
        }
    }

    #[test]
    fn test_empty_builder_is_valid() {
        let report = ReportBuilder::new("empty", ValidationMode::ByOrder, None, 0).finish();

        assert!(report.is_valid());
        assert!(report.tuples().is_empty());
        assert_eq!(report.mismatch_count(), 0);
    }

    #[test]
    fn test_mismatch_invalidates() {
        let mut builder = ReportBuilder::new("result", ValidationMode::ByOrder, Some(2), 1);
        builder.record_match(
            0,
            None,
            0,
            &Tuple::from_values(["a", "y"]),
            TupleMatch {
                fields_checked: 2,
                mismatches: vec![mismatch(1)],
            },
        );
        let report = builder.finish();

        assert!(!report.is_valid());
        assert_eq!(report.mismatch(0, 1), Some(&mismatch(1)));
        assert_eq!(report.mismatch(0, 0), None);
        assert_eq!(report.mismatch(3, 1), None);
        assert_eq!(report.stats().fields_checked, 2);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_unmatched_selectors() {
        let mut builder = ReportBuilder::new("result", ValidationMode::BySelector, None, 0);
        builder.record_unmatched(0, Some("Starship"));
        builder.record_unmatched(1, Some("Battlestar"));
        let report = builder.finish();

        assert!(!report.is_valid());
        assert_eq!(report.unmatched_selectors(), vec!["Starship", "Battlestar"]);
    }

    #[test]
    fn test_only_count_issue_invalidates() {
        let mut builder = ReportBuilder::new("result", ValidationMode::BySelector, Some(4), 2);
        builder.record_issue(DataSetIssue::TupleWidth {
            position: 0,
            expected: 4,
            actual: 2,
        });
        builder.record_issue(DataSetIssue::UnclaimedTuples { count: 2 });
        assert!(builder.finish().is_valid());

        let mut builder = ReportBuilder::new("result", ValidationMode::Single, None, 2);
        builder.record_issue(DataSetIssue::TupleCount {
            expected: 1,
            actual: 2,
        });
        assert!(!builder.finish().is_valid());
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(
            DataSetIssue::TupleCount {
                expected: 1,
                actual: 0
            }
            .to_string(),
            "expected 1 actual tuple(s), got 0"
        );
        assert_eq!(
            DataSetIssue::UnclaimedTuples { count: 3 }.to_string(),
            "3 actual tuple(s) not claimed by any tuple validator"
        );
    }
}
