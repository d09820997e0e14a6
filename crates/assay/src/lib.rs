//! Assay: format classification and enrichment comparison for tabular
//! datasets.
//!
//! Given a table of string-valued records, Assay infers which semantic
//! format dominates each column and flags columns that mix incompatible
//! formats. When one table's columns are merged into another's, it also
//! computes row-level reconciliation statistics for each mapping.
//!
//! # Core Principles
//!
//! - **Derived, not stored**: every result is computed fresh from the
//!   input table; nothing persists between calls
//! - **Deterministic**: classification is a pure function of the value,
//!   with a fixed category priority order and fixed tie-breaks
//! - **Degenerate inputs are answers, not errors**: empty columns,
//!   zero-row tables, and empty mappings resolve to neutral results
//!
//! # Example
//!
//! ```
//! use assay::{Assay, Table};
//!
//! let table = Table::from_columns(vec![
//!     ("signup", vec!["2024-01-05".to_string(), "01/05/2024".to_string()]),
//! ]);
//!
//! let assay = Assay::new();
//! let report = assay.quality_report(&table).unwrap();
//!
//! println!("Columns: {}", report.summary.total_fields);
//! println!("Warnings: {}", report.warnings.len());
//! ```

pub mod classify;
pub mod enrich;
pub mod error;
pub mod input;
pub mod report;

mod assay;

pub use crate::assay::{Assay, AssayConfig};
pub use classify::{classify, Classification, ColumnProfile, ColumnProfiler, FormatCategory, FormatTag};
pub use enrich::{
    aggregate_global_stats, reconcile_mapping, ColumnMapping, ComparisonStats, EnrichmentReport,
    GlobalStats, RowTransition,
};
pub use error::{AssayError, Result};
pub use input::{Parser, ParserConfig, Table};
pub use report::{GlobalIssue, QualityReport, Severity, Warning, WarningKind};
