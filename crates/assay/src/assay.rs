//! Main Assay struct and public API.

use serde::{Deserialize, Serialize};

use crate::classify::{ColumnProfile, ColumnProfiler, DEFAULT_DOMINANT_FRACTION_THRESHOLD};
use crate::enrich::{build_enrichment_report, ColumnMapping, EnrichmentReport};
use crate::error::{AssayError, Result};
use crate::input::Table;
use crate::report::{build_quality_report, QualityReport};

/// Configuration for an analysis run.
///
/// One configuration value applies uniformly to every column and mapping
/// of a run; the only process-wide default is the compile-time constant
/// behind [`AssayConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssayConfig {
    /// Dominant-fraction threshold below which a column is flagged as
    /// mixing formats. Must be in (0, 1]. Default: 0.8.
    pub dominant_fraction_threshold: f64,
    /// Population rate below which a column is sparsely populated.
    /// Default: 0.25.
    pub sparse_population_threshold: f64,
    /// Population rate below which a column is moderately populated.
    /// Default: 0.75.
    pub moderate_population_threshold: f64,
    /// Maximum example values attached to a warning. Default: 5.
    pub max_example_values: usize,
}

impl Default for AssayConfig {
    fn default() -> Self {
        Self {
            dominant_fraction_threshold: DEFAULT_DOMINANT_FRACTION_THRESHOLD,
            sparse_population_threshold: 0.25,
            moderate_population_threshold: 0.75,
            max_example_values: 5,
        }
    }
}

impl AssayConfig {
    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("dominant_fraction_threshold", self.dominant_fraction_threshold),
            ("sparse_population_threshold", self.sparse_population_threshold),
            ("moderate_population_threshold", self.moderate_population_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AssayError::Config(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        if self.sparse_population_threshold > self.moderate_population_threshold {
            return Err(AssayError::Config(
                "sparse_population_threshold cannot exceed moderate_population_threshold"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// The main analysis engine.
///
/// Holds no mutable state: every method is a pure function of its inputs
/// and the configuration, so independent tables can be analyzed by
/// independent `Assay` values (or the same one) with no coordination.
pub struct Assay {
    config: AssayConfig,
    profiler: ColumnProfiler,
}

impl Assay {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self {
            config: AssayConfig::default(),
            profiler: ColumnProfiler::new(),
        }
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: AssayConfig) -> Result<Self> {
        config.validate()?;
        let profiler = ColumnProfiler::with_threshold(config.dominant_fraction_threshold)?;
        Ok(Self { config, profiler })
    }

    /// The active configuration.
    pub fn config(&self) -> &AssayConfig {
        &self.config
    }

    /// Profile every column of a table, in table order.
    pub fn profile_table(&self, table: &Table) -> Vec<ColumnProfile> {
        (0..table.column_count())
            .map(|i| self.profiler.profile(table, i))
            .collect()
    }

    /// Profile a single column by name.
    pub fn profile_column(&self, table: &Table, name: &str) -> Result<ColumnProfile> {
        self.profiler.profile_named(table, name)
    }

    /// Profile every column and derive warnings and global issues.
    pub fn quality_report(&self, table: &Table) -> Result<QualityReport> {
        build_quality_report(table, &self.config)
    }

    /// Reconcile every mapping between a source and destination table and
    /// assemble the dataset-wide enrichment report.
    pub fn enrichment_report(
        &self,
        source: &Table,
        dest: &Table,
        mappings: &[ColumnMapping],
    ) -> Result<EnrichmentReport> {
        build_enrichment_report(source, dest, mappings)
    }
}

impl Default for Assay {
    fn default() -> Self {
        Self::new()
    }
}
