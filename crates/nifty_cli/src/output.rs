use colored::*;
use nifty_validator::{DataSetReport, JsonReporter, Reporter, TupleReport, TupleStatus};

pub fn print_report(report: &DataSetReport, format: &str) {
    match format {
        "json" => println!("{}", JsonReporter.format(report)),
        _ => print_text_report(report),
    }
}

fn print_text_report(report: &DataSetReport) {
    println!("\n{}", "═".repeat(60));
    println!(
        "{}",
        format!("  DATASET REPORT: {} ({})", report.name(), report.mode()).bold()
    );
    println!("{}", "═".repeat(60));

    if report.is_valid() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.tuples().is_empty() {
        println!("\n{}", "Tuples:".bold());
        for tuple in report.tuples() {
            print_tuple(tuple);
        }
    }

    if !report.issues().is_empty() {
        println!("\n{}", "Issues:".bold());
        for (i, issue) in report.issues().iter().enumerate() {
            let message = issue.to_string();
            if issue.invalidates() {
                println!("  {}. {}", i + 1, message.red());
            } else {
                println!("  {}. {}", i + 1, message.yellow());
            }
        }
    }

    let matched = report.tuples().iter().filter(|t| t.is_match()).count();
    println!("\n{}", "Summary:".bold());
    println!("  Tuples matched:   {}/{}", matched, report.tuples().len());
    println!("  Actual tuples:    {}", report.stats().actual_tuples);
    println!("  Fields checked:   {}", report.stats().fields_checked);
    println!("  Field mismatches: {}", report.mismatch_count());
    println!("{}", "═".repeat(60));
}

fn print_tuple(tuple: &TupleReport) {
    let label = match tuple.status {
        TupleStatus::Matched => tuple.status.label().green(),
        TupleStatus::Mismatched => tuple.status.label().red(),
        TupleStatus::Unmatched => tuple.status.label().yellow(),
    };
    let selector = tuple
        .selector
        .as_deref()
        .map(|s| format!(" [{s}]"))
        .unwrap_or_default();
    let actual = match (&tuple.actual, tuple.status) {
        (_, TupleStatus::Unmatched) => match &tuple.selector {
            Some(selector) => format!("no actual tuple contains \"{selector}\""),
            None => "no actual tuple at this position".to_string(),
        },
        (Some(actual), _) => actual.to_string(),
        (None, _) => String::new(),
    };

    println!("  #{}{} {} {}", tuple.index, selector, label, actual.dimmed());

    for mismatch in &tuple.mismatches {
        let value = match &mismatch.actual {
            Some(value) => format!("\"{value}\""),
            None => "null".to_string(),
        };
        println!(
            "      field {}: expected {}, actual {}",
            mismatch.index,
            mismatch.expected,
            value.red()
        );
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
