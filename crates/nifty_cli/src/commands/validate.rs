use anyhow::{Context, Result};
use nifty_parser::{parse_data_file, parse_file};
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(expectations_path: &str, data_path: &str, delimiter: &str, format: &str) -> Result<()> {
    info!("Validating data: {}", data_path);
    info!("Expectations: {}", expectations_path);

    let expectation = parse_file(Path::new(expectations_path))
        .with_context(|| format!("Failed to parse expectation file: {}", expectations_path))?;

    let validator = expectation
        .to_builder()
        .and_then(|builder| builder.build())
        .with_context(|| format!("Invalid expectation in: {}", expectations_path))?;

    let delimiter = unescape_delimiter(delimiter);
    let tuples = parse_data_file(Path::new(data_path), &delimiter)
        .with_context(|| format!("Failed to read data file: {}", data_path))?;

    if format != "json" {
        output::print_info(&format!(
            "Loaded {} tuple(s) for dataset '{}' ({})",
            tuples.len(),
            validator.name(),
            validator.mode()
        ));
    }

    let report = validator.validate(tuples);
    output::print_report(&report, format);

    if !report.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

/// Shells pass `\t` literally.
fn unescape_delimiter(delimiter: &str) -> String {
    match delimiter {
        "\\t" => "\t".to_string(),
        other => other.to_string(),
    }
}
