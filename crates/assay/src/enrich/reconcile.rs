//! Row-by-row reconciliation of a column mapping.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{ColumnProfiler, FormatCategory};
use crate::error::{AssayError, Result};
use crate::input::Table;

/// A mapping from one or more source columns to a destination column.
///
/// One source is a direct mapping; more than one is a many-to-one
/// consolidation. Source order matters: the value compared against the
/// destination is the first non-blank source cell in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Destination column name.
    pub destination: String,
    /// Contributing source column names, in priority order.
    pub sources: Vec<String>,
}

impl ColumnMapping {
    /// Create a mapping from several sources to one destination.
    pub fn new(destination: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            destination: destination.into(),
            sources,
        }
    }

    /// Create a one-to-one mapping.
    pub fn direct(destination: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            sources: vec![source.into()],
        }
    }

    /// Whether this mapping consolidates multiple source columns.
    pub fn is_many_to_one(&self) -> bool {
        self.sources.len() > 1
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.sources.join(" + "), self.destination)
    }
}

/// What happened to one row under one mapping.
///
/// Rows where neither side has a value are excluded from every count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTransition {
    /// Both sides populated and equal.
    Good,
    /// Both sides populated but different. The replacement is assumed to
    /// be an intended correction; a destination value that is *worse* than
    /// the source still lands here, since there is no `regressed` outcome.
    Fixed,
    /// Source empty, destination populated.
    Added,
    /// Source populated, destination empty.
    Discarded,
}

impl RowTransition {
    /// Classify one row's (old, new) value pair. `None` when neither side
    /// has a value; that row is excluded from every count.
    pub fn of(old: Option<&str>, new: Option<&str>) -> Option<RowTransition> {
        match (old, new) {
            (Some(old), Some(new)) if old == new => Some(RowTransition::Good),
            (None, Some(_)) => Some(RowTransition::Added),
            (Some(_), Some(_)) => Some(RowTransition::Fixed),
            (Some(_), None) => Some(RowTransition::Discarded),
            (None, None) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowTransition::Good => "good",
            RowTransition::Fixed => "fixed",
            RowTransition::Added => "added",
            RowTransition::Discarded => "discarded",
        }
    }
}

/// Dominant category and distinct-format count for one side of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFormatSummary {
    pub category: Option<FormatCategory>,
    pub format_count: usize,
}

/// Per-mapping comparison statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonStats {
    /// The mapping these statistics describe.
    pub mapping: ColumnMapping,
    /// Rows where both sides agree.
    pub good: usize,
    /// Rows where the destination replaced an existing value.
    pub fixed: usize,
    /// Rows where enrichment supplied a previously missing value.
    pub added: usize,
    /// Rows where enrichment dropped a previously present value.
    pub discarded: usize,
    /// Rows with neither side populated (excluded from rates).
    pub both_empty: usize,
    /// Total rows inspected.
    pub total_rows: usize,
    /// Rows counted toward rates: at least one side populated.
    pub compared_rows: usize,
    /// Rows with any non-`good` outcome.
    pub records_modified: usize,
    /// Rates over `compared_rows`; all 0.0 when that denominator is 0.
    pub good_rate: f64,
    pub fixed_rate: f64,
    pub added_rate: f64,
    pub discarded_rate: f64,
    /// Rows unchanged by enrichment (good or both empty), over total rows,
    /// as a percentage.
    pub correct_percentage_before: f64,
    /// Rows populated after enrichment, over total rows, as a percentage.
    pub correct_percentage_after: f64,
    /// Classification of the combined source values.
    pub source_format: ColumnFormatSummary,
    /// Classification of the destination column.
    pub dest_format: ColumnFormatSummary,
}

impl ComparisonStats {
    /// Rate for one transition kind.
    pub fn rate(&self, transition: RowTransition) -> f64 {
        match transition {
            RowTransition::Good => self.good_rate,
            RowTransition::Fixed => self.fixed_rate,
            RowTransition::Added => self.added_rate,
            RowTransition::Discarded => self.discarded_rate,
        }
    }

    /// Count for one transition kind.
    pub fn count(&self, transition: RowTransition) -> usize {
        match transition {
            RowTransition::Good => self.good,
            RowTransition::Fixed => self.fixed,
            RowTransition::Added => self.added,
            RowTransition::Discarded => self.discarded,
        }
    }
}

/// Reconcile one mapping between a source and a destination table.
///
/// Row order is assumed to carry identity across the two tables; the only
/// check here is a fail-fast length comparison. Returns
/// [`AssayError::ShapeMismatch`] when the tables disagree on row count and
/// [`AssayError::UnknownColumn`] when a mapped column is missing.
pub fn reconcile_mapping(
    mapping: &ColumnMapping,
    source: &Table,
    dest: &Table,
) -> Result<ComparisonStats> {
    let mut modified = HashSet::new();
    reconcile_into(mapping, source, dest, &mut modified)
}

/// Reconcile and record modified row indices into `modified`, so a caller
/// running several mappings can count distinct rows across all of them.
pub(crate) fn reconcile_into(
    mapping: &ColumnMapping,
    source: &Table,
    dest: &Table,
    modified: &mut HashSet<usize>,
) -> Result<ComparisonStats> {
    if source.row_count() != dest.row_count() {
        return Err(AssayError::ShapeMismatch {
            destination: mapping.destination.clone(),
            source_rows: source.row_count(),
            dest_rows: dest.row_count(),
        });
    }

    let dest_index =
        dest.column_index(&mapping.destination)
            .ok_or_else(|| AssayError::UnknownColumn {
                column: mapping.destination.clone(),
                table: "destination".to_string(),
            })?;

    let source_indices: Vec<usize> = mapping
        .sources
        .iter()
        .map(|name| {
            source
                .column_index(name)
                .ok_or_else(|| AssayError::UnknownColumn {
                    column: name.clone(),
                    table: "source".to_string(),
                })
        })
        .collect::<Result<_>>()?;

    let mut good = 0usize;
    let mut fixed = 0usize;
    let mut added = 0usize;
    let mut discarded = 0usize;
    let mut both_empty = 0usize;

    for (row_idx, row) in dest.rows.iter().enumerate() {
        // Old value: the first non-blank contributing source cell. Validity
        // is the OR over all contributing cells.
        let old = source_indices
            .iter()
            .filter_map(|&i| source.rows[row_idx].get(i).map(|s| s.trim()))
            .find(|v| !v.is_empty());
        let new = row.get(dest_index).map(|s| s.trim()).filter(|v| !v.is_empty());

        match RowTransition::of(old, new) {
            Some(RowTransition::Good) => good += 1,
            Some(RowTransition::Added) => {
                added += 1;
                modified.insert(row_idx);
            }
            Some(RowTransition::Fixed) => {
                fixed += 1;
                modified.insert(row_idx);
            }
            Some(RowTransition::Discarded) => {
                discarded += 1;
                modified.insert(row_idx);
            }
            None => both_empty += 1,
        }
    }

    let total_rows = dest.row_count();
    let compared_rows = good + fixed + added + discarded;
    let rate = |count: usize| {
        if compared_rows == 0 {
            0.0
        } else {
            count as f64 / compared_rows as f64
        }
    };
    let percentage = |count: usize| {
        if total_rows == 0 {
            0.0
        } else {
            count as f64 / total_rows as f64 * 100.0
        }
    };

    let dest_populated = dest
        .column_values(dest_index)
        .filter(|v| !Table::is_blank(v))
        .count();

    Ok(ComparisonStats {
        good,
        fixed,
        added,
        discarded,
        both_empty,
        total_rows,
        compared_rows,
        records_modified: fixed + added + discarded,
        good_rate: rate(good),
        fixed_rate: rate(fixed),
        added_rate: rate(added),
        discarded_rate: rate(discarded),
        correct_percentage_before: percentage(good + both_empty),
        correct_percentage_after: percentage(dest_populated),
        source_format: summarize_sources(source, &source_indices),
        dest_format: summarize_column(dest, dest_index),
        mapping: mapping.clone(),
    })
}

/// Dominant category and format count over the combined cells of the
/// contributing source columns.
fn summarize_sources(table: &Table, indices: &[usize]) -> ColumnFormatSummary {
    let profiler = ColumnProfiler::new();
    let values: Vec<&str> = indices
        .iter()
        .flat_map(|&i| table.column_values(i))
        .collect();
    let profile = profiler.profile_values("source", values);
    ColumnFormatSummary {
        category: profile.dominant_category,
        format_count: profile.dominant_format_count(),
    }
}

fn summarize_column(table: &Table, index: usize) -> ColumnFormatSummary {
    let profiler = ColumnProfiler::new();
    let profile = profiler.profile(table, index);
    ColumnFormatSummary {
        category: profile.dominant_category,
        format_count: profile.dominant_format_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn single_column_tables(source: &[&str], dest: &[&str]) -> (Table, Table) {
        (
            Table::from_columns(vec![("src", strings(source))]),
            Table::from_columns(vec![("dst", strings(dest))]),
        )
    }

    #[test]
    fn test_row_transition_policy() {
        assert_eq!(
            RowTransition::of(Some("x"), Some("x")),
            Some(RowTransition::Good)
        );
        assert_eq!(RowTransition::of(None, Some("x")), Some(RowTransition::Added));
        assert_eq!(
            RowTransition::of(Some("x"), Some("y")),
            Some(RowTransition::Fixed)
        );
        assert_eq!(RowTransition::of(Some("x"), None), Some(RowTransition::Discarded));
        assert_eq!(RowTransition::of(None, None), None);
    }

    #[test]
    fn test_stats_accessors() {
        let (source, dest) = single_column_tables(&["", "foo"], &["bar", "foo"]);
        let stats =
            reconcile_mapping(&ColumnMapping::direct("dst", "src"), &source, &dest).unwrap();

        assert_eq!(stats.count(RowTransition::Added), 1);
        assert_eq!(stats.count(RowTransition::Good), 1);
        assert_eq!(stats.rate(RowTransition::Added), 0.5);
        assert_eq!(RowTransition::Added.as_str(), "added");
    }

    #[test]
    fn test_transition_policy() {
        let (source, dest) = single_column_tables(
            &["", "foo", "foo", "bar", ""],
            &["bar", "foo", "baz", "", ""],
        );
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(stats.added, 1);
        assert_eq!(stats.good, 1);
        assert_eq!(stats.fixed, 1);
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.both_empty, 1);
        assert_eq!(stats.records_modified, 3);
        assert_eq!(stats.compared_rows, 4);
    }

    #[test]
    fn test_records_modified_counts_non_good_rows() {
        let (source, dest) = single_column_tables(&["", "foo", "foo"], &["bar", "foo", "baz"]);
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(stats.added, 1);
        assert_eq!(stats.good, 1);
        assert_eq!(stats.fixed, 1);
        assert_eq!(stats.records_modified, 2);
    }

    #[test]
    fn test_counts_partition_row_count() {
        let (source, dest) = single_column_tables(
            &["a", "", "c", "", "e", "f"],
            &["a", "b", "", "", "x", "f"],
        );
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(
            stats.good + stats.fixed + stats.added + stats.discarded + stats.both_empty,
            stats.total_rows
        );
    }

    #[test]
    fn test_all_empty_yields_zero_rates() {
        let (source, dest) = single_column_tables(&["", "", ""], &["", "", ""]);
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(stats.compared_rows, 0);
        assert_eq!(stats.good_rate, 0.0);
        assert_eq!(stats.fixed_rate, 0.0);
        assert_eq!(stats.added_rate, 0.0);
        assert_eq!(stats.discarded_rate, 0.0);
        assert_eq!(stats.correct_percentage_after, 0.0);
    }

    #[test]
    fn test_whitespace_is_empty_and_values_are_trimmed() {
        let (source, dest) = single_column_tables(&["  ", " foo "], &["x", "foo"]);
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(stats.added, 1);
        assert_eq!(stats.good, 1);
    }

    #[test]
    fn test_many_to_one_or_semantics() {
        let source = Table::from_columns(vec![
            ("mobile", strings(&["", "", "555-123-4567"])),
            ("office", strings(&["555-999-0000", "", ""])),
        ]);
        let dest = Table::from_columns(vec![(
            "phone",
            strings(&["555-999-0000", "555-111-2222", ""]),
        )]);
        let mapping = ColumnMapping::new("phone", vec!["mobile".into(), "office".into()]);

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        // row 0: mobile blank, office matches -> good (OR validity)
        // row 1: both sources blank, dest populated -> added
        // row 2: mobile populated, dest blank -> discarded
        assert_eq!(stats.good, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.discarded, 1);
        assert!(mapping.is_many_to_one());
    }

    #[test]
    fn test_many_to_one_first_non_blank_wins() {
        let source = Table::from_columns(vec![
            ("primary", strings(&["alpha"])),
            ("fallback", strings(&["beta"])),
        ]);
        let dest = Table::from_columns(vec![("merged", strings(&["beta"]))]);
        let mapping = ColumnMapping::new("merged", vec!["primary".into(), "fallback".into()]);

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        // compared against "alpha", not "beta"
        assert_eq!(stats.fixed, 1);
        assert_eq!(stats.good, 0);
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let (source, dest) = single_column_tables(&["a", "b"], &["a"]);
        let mapping = ColumnMapping::direct("dst", "src");

        let err = reconcile_mapping(&mapping, &source, &dest).unwrap_err();
        assert!(matches!(err, AssayError::ShapeMismatch { .. }));
        assert!(err.to_string().contains("dst"));
    }

    #[test]
    fn test_unknown_column() {
        let (source, dest) = single_column_tables(&["a"], &["a"]);

        let missing_src = ColumnMapping::direct("dst", "nope");
        assert!(matches!(
            reconcile_mapping(&missing_src, &source, &dest),
            Err(AssayError::UnknownColumn { .. })
        ));

        let missing_dst = ColumnMapping::direct("nope", "src");
        assert!(matches!(
            reconcile_mapping(&missing_dst, &source, &dest),
            Err(AssayError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_correct_percentages() {
        let (source, dest) = single_column_tables(
            &["a", "b", "", ""],
            &["a", "x", "y", ""],
        );
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        // unchanged: row 0 (good) + row 3 (both empty) = 2 of 4
        assert_eq!(stats.correct_percentage_before, 50.0);
        // populated after: rows 0, 1, 2 = 3 of 4
        assert_eq!(stats.correct_percentage_after, 75.0);
    }

    #[test]
    fn test_side_format_summaries() {
        let (source, dest) = single_column_tables(
            &["a@x.com", "b@y.com", "c@z.com"],
            &["2024-01-05", "01/05/2024", "2024-02-01"],
        );
        let mapping = ColumnMapping::direct("dst", "src");

        let stats = reconcile_mapping(&mapping, &source, &dest).unwrap();

        assert_eq!(stats.source_format.category, Some(FormatCategory::Email));
        assert_eq!(stats.dest_format.category, Some(FormatCategory::Date));
        assert_eq!(stats.dest_format.format_count, 2);
    }
}
