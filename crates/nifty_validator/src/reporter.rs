//! Report rendering.
//!
//! Reporters turn a [`DataSetReport`] into text. Rendering is a pure
//! function of the report: the same report always renders the same text.

use crate::{DataSetReport, TupleReport, TupleStatus};
use serde_json::json;
use std::fmt;

/// Renders a dataset report.
pub trait Reporter {
    /// Formats the report as text.
    fn format(&self, report: &DataSetReport) -> String;
}

/// Plain text reporter, grouped by tuple validator.
///
/// ```text
/// Dataset 'result' (by_selector, size 2): FAILED
///   #0 [1234] PASSED (1234,Garbage)
///   #1 [12345] FAILED (12345,Collector)
///       field 1: expected string("Garbage"), actual "Collector"
/// Summary: 1/2 tuple(s) matched, 2 actual tuple(s), 1 field mismatch(es)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StringReporter;

impl Reporter for StringReporter {
    fn format(&self, report: &DataSetReport) -> String {
        TextReport(report).to_string()
    }
}

/// JSON reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn format(&self, report: &DataSetReport) -> String {
        let output = json!({
            "dataset": report.name(),
            "mode": report.mode(),
            "expected_tuple_size": report.expected_tuple_size(),
            "valid": report.is_valid(),
            "tuples": report.tuples(),
            "issues": report.issues(),
            "summary": {
                "actual_tuples": report.stats().actual_tuples,
                "tuple_validators": report.stats().tuple_validators,
                "fields_checked": report.stats().fields_checked,
                "mismatches": report.mismatch_count(),
            }
        });

        format!("{output:#}")
    }
}

/// Renders `report` with the [`StringReporter`].
pub fn format_report(report: &DataSetReport) -> String {
    StringReporter.format(report)
}

struct TextReport<'a>(&'a DataSetReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        write!(f, "Dataset '{}' ({}", report.name(), report.mode())?;
        if let Some(size) = report.expected_tuple_size() {
            write!(f, ", size {size}")?;
        }
        writeln!(
            f,
            "): {}",
            if report.is_valid() { "PASSED" } else { "FAILED" }
        )?;

        for tuple in report.tuples() {
            write_tuple(f, tuple)?;
        }

        for issue in report.issues() {
            let marker = if issue.invalidates() { "error" } else { "note" };
            writeln!(f, "  {marker}: {issue}")?;
        }

        let matched = report.tuples().iter().filter(|t| t.is_match()).count();
        write!(
            f,
            "Summary: {}/{} tuple(s) matched, {} actual tuple(s), {} field mismatch(es)",
            matched,
            report.tuples().len(),
            report.stats().actual_tuples,
            report.mismatch_count()
        )
    }
}

fn write_tuple(f: &mut fmt::Formatter<'_>, tuple: &TupleReport) -> fmt::Result {
    write!(f, "  #{}", tuple.index)?;
    if let Some(selector) = &tuple.selector {
        write!(f, " [{selector}]")?;
    }
    write!(f, " {}", tuple.status.label())?;

    match (&tuple.actual, tuple.status) {
        (_, TupleStatus::Unmatched) => match &tuple.selector {
            Some(selector) => writeln!(f, " no actual tuple contains \"{selector}\"")?,
            None => writeln!(f, " no actual tuple at this position")?,
        },
        (Some(actual), _) => writeln!(f, " {actual}")?,
        (None, _) => writeln!(f)?,
    }

    for mismatch in &tuple.mismatches {
        let actual = match &mismatch.actual {
            Some(value) => format!("\"{value}\""),
            None => "null".to_string(),
        };
        writeln!(
            f,
            "      field {}: expected {}, actual {}",
            mismatch.index, mismatch.expected, actual
        )?;
    }

    Ok(())
}
