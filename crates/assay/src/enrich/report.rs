//! Dataset-wide enrichment statistics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Table;

use super::reconcile::{reconcile_into, ColumnMapping, ComparisonStats};

/// Whole-dataset rollup of an enrichment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Destination columns that are no mapping's destination.
    pub new_columns: usize,
    /// Mappings consolidating more than one source column.
    pub many_to_one: usize,
    /// Distinct source columns referenced across all mappings minus the
    /// distinct destination columns they produce. Negative when enrichment
    /// expanded the column count; never clamped.
    pub column_reduction: i64,
    /// Destination columns created by the export.
    pub columns_created: usize,
    /// Source columns supplied to the run.
    pub source_columns: usize,
}

/// Roll mapping-level shape into dataset statistics.
///
/// Pure set arithmetic over the mapping list; no per-row work.
pub fn aggregate_global_stats(
    mappings: &[ColumnMapping],
    dest_columns: &[String],
    source_columns: &[String],
) -> GlobalStats {
    let mapped_destinations: HashSet<&str> =
        mappings.iter().map(|m| m.destination.as_str()).collect();
    let referenced_sources: HashSet<&str> = mappings
        .iter()
        .flat_map(|m| m.sources.iter().map(String::as_str))
        .collect();

    let new_columns = dest_columns
        .iter()
        .filter(|name| !mapped_destinations.contains(name.as_str()))
        .count();

    let many_to_one = mappings.iter().filter(|m| m.is_many_to_one()).count();

    let column_reduction = referenced_sources.len() as i64 - mapped_destinations.len() as i64;

    GlobalStats {
        new_columns,
        many_to_one,
        column_reduction,
        columns_created: dest_columns.len(),
        source_columns: source_columns.len(),
    }
}

/// Complete result of reconciling every mapping between two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentReport {
    /// Rows in the (equal-length) tables.
    pub total_rows: usize,
    /// Dataset-wide rollup.
    pub global: GlobalStats,
    /// Per-mapping comparison statistics, in mapping order.
    pub mappings: Vec<ComparisonStats>,
    /// Distinct rows modified by at least one mapping. A row fixed under
    /// one mapping and added under another counts once.
    pub records_modified: usize,
}

/// Reconcile every mapping and assemble the dataset report.
pub fn build_enrichment_report(
    source: &Table,
    dest: &Table,
    mappings: &[ColumnMapping],
) -> Result<EnrichmentReport> {
    let mut modified: HashSet<usize> = HashSet::new();
    let mut stats = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        stats.push(reconcile_into(mapping, source, dest, &mut modified)?);
    }

    let global = aggregate_global_stats(mappings, &dest.headers, &source.headers);

    Ok(EnrichmentReport {
        total_rows: dest.row_count(),
        global,
        mappings: stats,
        records_modified: modified.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_global_stats_scenario() {
        // five source columns consolidated into three destinations, plus
        // one brand-new destination column
        let mappings = vec![
            ColumnMapping::new("full_name", vec!["first".into(), "last".into(), "nick".into()]),
            ColumnMapping::direct("email", "email_crm"),
            ColumnMapping::direct("phone", "phone_crm"),
        ];
        let dest = strings(&["full_name", "email", "phone", "company_size"]);
        let source = strings(&["first", "last", "nick", "email_crm", "phone_crm"]);

        let global = aggregate_global_stats(&mappings, &dest, &source);

        assert_eq!(global.new_columns, 1);
        assert_eq!(global.many_to_one, 1);
        assert_eq!(global.column_reduction, 2);
        assert_eq!(global.columns_created, 4);
        assert_eq!(global.source_columns, 5);
    }

    #[test]
    fn test_column_reduction_can_be_negative() {
        // one source feeding two destinations: enrichment expanded columns
        let mappings = vec![
            ColumnMapping::direct("city", "address"),
            ColumnMapping::direct("country", "address"),
        ];
        let global = aggregate_global_stats(
            &mappings,
            &strings(&["city", "country"]),
            &strings(&["address"]),
        );

        assert_eq!(global.column_reduction, -1);
    }

    #[test]
    fn test_empty_mapping_list() {
        let global = aggregate_global_stats(&[], &strings(&["a", "b"]), &strings(&["x"]));

        assert_eq!(global.new_columns, 2);
        assert_eq!(global.many_to_one, 0);
        assert_eq!(global.column_reduction, 0);
    }

    #[test]
    fn test_distinct_modified_rows_across_mappings() {
        let source = Table::from_columns(vec![
            ("a", strings(&["1", "2", "3", "4"])),
            ("b", strings(&["x", "y", "z", "w"])),
        ]);
        let dest = Table::from_columns(vec![
            ("a2", strings(&["1", "9", "3", "9"])), // rows 1, 3 fixed
            ("b2", strings(&["x", "q", "z", "w"])), // row 1 fixed
        ]);
        let mappings = vec![
            ColumnMapping::direct("a2", "a"),
            ColumnMapping::direct("b2", "b"),
        ];

        let report = build_enrichment_report(&source, &dest, &mappings).unwrap();

        // rows 1 and 3 modified; row 1 under both mappings counts once
        assert_eq!(report.records_modified, 2);
        assert_eq!(report.mappings.len(), 2);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.mappings[0].records_modified, 2);
        assert_eq!(report.mappings[1].records_modified, 1);
    }

    #[test]
    fn test_report_propagates_shape_mismatch() {
        let source = Table::from_columns(vec![("a", strings(&["1", "2"]))]);
        let dest = Table::from_columns(vec![("a2", strings(&["1"]))]);
        let mappings = vec![ColumnMapping::direct("a2", "a")];

        assert!(build_enrichment_report(&source, &dest, &mappings).is_err());
    }
}
