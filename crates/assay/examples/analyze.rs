//! Example: Analyze a CSV/TSV file with Assay.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>

use std::env;
use std::fs;

use assay::{Assay, Parser};

fn main() -> assay::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let contents = match fs::read(file_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {}", file_path, e);
            std::process::exit(1);
        }
    };

    let table = Parser::new().parse_bytes(&contents)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Assay Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let assay = Assay::new();
    let report = assay.quality_report(&table)?;

    println!("## Summary");
    println!("  Rows: {}", report.summary.total_records);
    println!("  Columns: {}", report.summary.total_fields);
    println!("  Columns with issues: {}", report.summary.fields_with_issues);
    println!();

    println!("## Columns ({})", report.fields.len());
    println!();
    for profile in &report.fields {
        let category = profile
            .dominant_category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:24} {:10} populated={:<5} formats={:<3} dominant={:.0}%{}",
            profile.name,
            category,
            profile.populated_count,
            profile.dominant_format_count(),
            profile.dominant_fraction * 100.0,
            if profile.inconsistent { "  [mixed]" } else { "" },
        );
    }
    println!();

    if !report.warnings.is_empty() {
        println!("## Warnings ({})", report.warnings.len());
        println!();
        for warning in &report.warnings {
            println!(
                "  [{}] {}: {}",
                warning.severity.label(),
                warning.column,
                warning.message
            );
            if !warning.examples.is_empty() {
                println!("      examples: {}", warning.examples.join(", "));
            }
        }
        println!();
    }

    for issue in &report.global_issues {
        println!("## {}", issue.title);
        println!("  {}", issue.description);
    }

    Ok(())
}
