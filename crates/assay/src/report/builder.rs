//! Assembles a quality report from column profiles.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::assay::AssayConfig;
use crate::classify::{classify, ColumnProfile, ColumnProfiler, FormatCategory};
use crate::error::Result;
use crate::input::Table;

use super::warning::{GlobalIssue, Severity, Warning, WarningKind};

/// Summary statistics for a quality report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total data rows analyzed.
    pub total_records: usize,
    /// Total columns analyzed.
    pub total_fields: usize,
    /// Columns with at least one warning.
    pub fields_with_issues: usize,
}

/// A full quality report for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Per-column profiles, in table order.
    pub fields: Vec<ColumnProfile>,
    /// Column-level warnings.
    pub warnings: Vec<Warning>,
    /// Dataset-wide issues.
    pub global_issues: Vec<GlobalIssue>,
    /// Summary statistics.
    pub summary: ReportSummary,
}

/// Profile every column of a table and derive warnings and global issues.
pub fn build_quality_report(table: &Table, config: &AssayConfig) -> Result<QualityReport> {
    let profiler = ColumnProfiler::with_threshold(config.dominant_fraction_threshold)?;

    let fields: Vec<ColumnProfile> = (0..table.column_count())
        .map(|i| profiler.profile(table, i))
        .collect();

    let mut warnings = Vec::new();
    for (index, profile) in fields.iter().enumerate() {
        collect_population_warnings(profile, config, &mut warnings);
        collect_format_warnings(table, index, profile, config, &mut warnings);
    }

    let global_issues = vec![date_format_audit(&fields)];

    let affected: HashSet<&str> = warnings.iter().map(|w| w.column.as_str()).collect();
    let summary = ReportSummary {
        total_records: table.row_count(),
        total_fields: table.column_count(),
        fields_with_issues: affected.len(),
    };

    Ok(QualityReport {
        fields,
        warnings,
        global_issues,
        summary,
    })
}

fn collect_population_warnings(
    profile: &ColumnProfile,
    config: &AssayConfig,
    warnings: &mut Vec<Warning>,
) {
    // A zero-row table has nothing to say about population.
    if profile.row_count == 0 {
        return;
    }

    let rate = profile.population_rate();
    if profile.populated_count == 0 {
        warnings.push(Warning::new(
            WarningKind::EmptyField,
            Severity::High,
            &profile.name,
            "Column is completely empty (0% populated)",
        ));
    } else if rate < config.sparse_population_threshold {
        warnings.push(Warning::new(
            WarningKind::LowPopulation,
            Severity::Medium,
            &profile.name,
            format!("Column is sparsely populated ({:.1}% populated)", rate * 100.0),
        ));
    } else if rate < config.moderate_population_threshold {
        warnings.push(Warning::new(
            WarningKind::LowPopulation,
            Severity::Low,
            &profile.name,
            format!("Column has moderate population ({:.1}% populated)", rate * 100.0),
        ));
    }
}

fn collect_format_warnings(
    table: &Table,
    index: usize,
    profile: &ColumnProfile,
    config: &AssayConfig,
    warnings: &mut Vec<Warning>,
) {
    let format_count = profile.dominant_format_count();
    if format_count > 1 {
        let examples = example_values(table, index, config.max_example_values, |_| true);
        warnings.push(
            Warning::new(
                WarningKind::InconsistentFormat,
                Severity::Medium,
                &profile.name,
                format!("Column has {format_count} different formats detected"),
            )
            .with_examples(examples),
        );
    }

    if profile.inconsistent {
        let dominant = profile
            .dominant_category
            .map(|c| c.to_string())
            .unwrap_or_default();
        let categories: HashSet<FormatCategory> =
            profile.format_counts.iter().map(|o| o.category).collect();
        let examples = example_values(table, index, config.max_example_values, |value| {
            classify(value).category() != profile.dominant_category
        });
        warnings.push(
            Warning::new(
                WarningKind::MixedTypes,
                Severity::Medium,
                &profile.name,
                format!(
                    "Column mixes {} format categories ({} dominant at {:.1}%)",
                    categories.len(),
                    dominant,
                    profile.dominant_fraction * 100.0
                ),
            )
            .with_examples(examples),
        );
    }
}

/// Up to `limit` distinct non-blank values from a column, in row order,
/// filtered by `keep`.
fn example_values(
    table: &Table,
    index: usize,
    limit: usize,
    keep: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for value in table.column_values(index) {
        let trimmed = value.trim();
        if trimmed.is_empty() || !keep(trimmed) {
            continue;
        }
        seen.insert(trimmed.to_string());
        if seen.len() >= limit {
            break;
        }
    }
    seen.into_iter().collect()
}

/// Count the distinct date sub-formats across all date-dominant columns.
fn date_format_audit(fields: &[ColumnProfile]) -> GlobalIssue {
    let distinct: HashSet<String> = fields
        .iter()
        .filter(|p| p.dominant_category == Some(FormatCategory::Date))
        .flat_map(|p| p.tags_for(FormatCategory::Date).map(|t| t.to_string()))
        .collect();

    GlobalIssue {
        kind: "date_format_across_cols".to_string(),
        title: "Date formats across columns".to_string(),
        description: format!(
            "Found {} unique date formats across columns",
            distinct.len()
        ),
        severity: Severity::Low,
    }
}
