use anyhow::{Context, Result};
use nifty_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(expectations_path: &str, format: &str) -> Result<()> {
    info!("Checking expectation file: {}", expectations_path);

    let path = Path::new(expectations_path);
    let expectation = parse_file(path)
        .with_context(|| format!("Failed to parse expectation file: {}", expectations_path))?;

    // Building the validator surfaces mode, selector and pattern mistakes
    let validator = expectation
        .to_builder()
        .and_then(|builder| builder.build())
        .with_context(|| format!("Invalid expectation in: {}", expectations_path))?;

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&expectation)
                .context("Failed to serialize expectation")?
        );
        return Ok(());
    }

    output::print_info(&format!(
        "Expectation loaded: {} ({})",
        validator.name(),
        validator.mode()
    ));
    output::print_success("Expectation is valid");

    println!("\nExpectation Summary:");
    println!("  Dataset:     {}", validator.name());
    println!("  Mode:        {}", validator.mode());
    println!(
        "  Tuple size:  {}",
        validator
            .expected_tuple_size()
            .map_or_else(|| "N/A".to_string(), |size| size.to_string())
    );
    println!(
        "  Description: {}",
        expectation.description.as_deref().unwrap_or("N/A")
    );
    println!("  Tuples:      {}", validator.tuples().len());

    for (i, tuple) in validator.tuples().iter().enumerate() {
        let selector = tuple
            .selector()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        println!("    #{i}{selector} {}", tuple.descriptions().join(", "));
    }

    Ok(())
}
