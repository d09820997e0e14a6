//! Column-level aggregation of value classifications.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AssayError, Result};
use crate::input::Table;

use super::value::{classify, Classification, FormatCategory, FormatTag};

/// Default dominant-fraction threshold below which a column is flagged as
/// mixing incompatible formats.
pub const DEFAULT_DOMINANT_FRACTION_THRESHOLD: f64 = 0.8;

/// One observed (category, tag) pair and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatObservation {
    pub category: FormatCategory,
    pub tag: Option<FormatTag>,
    pub count: usize,
}

/// Profile of a single column: population, format distribution, dominant
/// category, and the inconsistency verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Total row count, including blank cells.
    pub row_count: usize,
    /// Number of non-blank cells.
    pub populated_count: usize,
    /// Occurrence counts per (category, tag), in first-observation order.
    pub format_counts: Vec<FormatObservation>,
    /// The category with the highest count among non-blank cells. `None`
    /// for an unpopulated column.
    pub dominant_category: Option<FormatCategory>,
    /// Dominant-category count over populated count. Defined as 1.0 for an
    /// unpopulated column, which is "unpopulated", not "inconsistent".
    pub dominant_fraction: f64,
    /// Whether the dominant fraction fell below the configured threshold.
    pub inconsistent: bool,
}

impl ColumnProfile {
    /// Fraction of rows that are populated (0.0 for a zero-row table).
    pub fn population_rate(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.populated_count as f64 / self.row_count as f64
        }
    }

    /// Total occurrences of a category.
    pub fn category_count(&self, category: FormatCategory) -> usize {
        self.format_counts
            .iter()
            .filter(|o| o.category == category)
            .map(|o| o.count)
            .sum()
    }

    /// Number of distinct sub-format tags observed for a category.
    pub fn distinct_formats(&self, category: FormatCategory) -> usize {
        self.format_counts
            .iter()
            .filter(|o| o.category == category)
            .count()
    }

    /// Distinct sub-format tags within the dominant category, or 0 for an
    /// unpopulated column.
    pub fn dominant_format_count(&self) -> usize {
        self.dominant_category
            .map(|c| self.distinct_formats(c))
            .unwrap_or(0)
    }

    /// The distribution of (category, tag) pairs outside the dominant
    /// category, for rendering an inconsistency breakdown.
    pub fn non_dominant(&self) -> Vec<&FormatObservation> {
        self.format_counts
            .iter()
            .filter(|o| Some(o.category) != self.dominant_category)
            .collect()
    }

    /// Sub-format tags observed for a category.
    pub fn tags_for(&self, category: FormatCategory) -> impl Iterator<Item = &FormatTag> {
        self.format_counts
            .iter()
            .filter(move |o| o.category == category)
            .filter_map(|o| o.tag.as_ref())
    }
}

/// Profiles columns against a dominant-fraction threshold.
///
/// The threshold is carried per profiler instance so one configured value
/// applies uniformly to every column of a run; there is no process-wide
/// mutable default.
#[derive(Debug, Clone)]
pub struct ColumnProfiler {
    dominant_fraction_threshold: f64,
}

impl ColumnProfiler {
    /// Create a profiler with the default threshold
    /// ([`DEFAULT_DOMINANT_FRACTION_THRESHOLD`]).
    pub fn new() -> Self {
        Self {
            dominant_fraction_threshold: DEFAULT_DOMINANT_FRACTION_THRESHOLD,
        }
    }

    /// Create a profiler with a custom threshold, which must lie in (0, 1].
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(AssayError::Config(format!(
                "dominant fraction threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            dominant_fraction_threshold: threshold,
        })
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.dominant_fraction_threshold
    }

    /// Profile a column by table index.
    pub fn profile(&self, table: &Table, index: usize) -> ColumnProfile {
        let name = table
            .headers
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("column_{}", index + 1));
        self.profile_values(name, table.column_values(index))
    }

    /// Profile a column by name.
    pub fn profile_named(&self, table: &Table, name: &str) -> Result<ColumnProfile> {
        let index = table
            .column_index(name)
            .ok_or_else(|| AssayError::UnknownColumn {
                column: name.to_string(),
                table: "input".to_string(),
            })?;
        Ok(self.profile(table, index))
    }

    /// Profile a sequence of cell values.
    pub fn profile_values<'a, I>(&self, name: impl Into<String>, values: I) -> ColumnProfile
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut row_count = 0usize;
        let mut populated_count = 0usize;
        let mut counts: IndexMap<(FormatCategory, Option<FormatTag>), usize> = IndexMap::new();

        for value in values {
            row_count += 1;
            match classify(value) {
                Classification::Empty => {}
                Classification::Value { category, tag } => {
                    populated_count += 1;
                    *counts.entry((category, tag)).or_insert(0) += 1;
                }
            }
        }

        let dominant_category = dominant(&counts);
        let dominant_fraction = match dominant_category {
            Some(category) => {
                let dominant_count: usize = counts
                    .iter()
                    .filter(|((c, _), _)| *c == category)
                    .map(|(_, n)| *n)
                    .sum();
                dominant_count as f64 / populated_count as f64
            }
            None => 1.0,
        };
        let inconsistent =
            dominant_category.is_some() && dominant_fraction < self.dominant_fraction_threshold;

        let format_counts = counts
            .into_iter()
            .map(|((category, tag), count)| FormatObservation {
                category,
                tag,
                count,
            })
            .collect();

        ColumnProfile {
            name: name.into(),
            row_count,
            populated_count,
            format_counts,
            dominant_category,
            dominant_fraction,
            inconsistent,
        }
    }
}

impl Default for ColumnProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest-count category; ties break toward the earlier entry in the
/// classification priority order.
fn dominant(counts: &IndexMap<(FormatCategory, Option<FormatTag>), usize>) -> Option<FormatCategory> {
    let mut totals: IndexMap<FormatCategory, usize> = IndexMap::new();
    for ((category, _), count) in counts {
        *totals.entry(*category).or_insert(0) += count;
    }

    totals
        .into_iter()
        .max_by(|(cat_a, count_a), (cat_b, count_b)| {
            count_a.cmp(count_b).then_with(|| cat_b.cmp(cat_a))
        })
        .map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_of(values: &[&str]) -> ColumnProfile {
        ColumnProfiler::new().profile_values("test", values.iter().copied())
    }

    #[test]
    fn test_uniform_column() {
        let profile = profile_of(&["a@x.com", "b@y.org", "c@z.net"]);

        assert_eq!(profile.dominant_category, Some(FormatCategory::Email));
        assert_eq!(profile.dominant_fraction, 1.0);
        assert!(!profile.inconsistent);
        assert_eq!(profile.populated_count, 3);
    }

    #[test]
    fn test_category_counts_sum_to_populated() {
        let profile = profile_of(&["a@x.com", "", "hello", "42", "  ", "2024-01-05"]);

        let total: usize = profile.format_counts.iter().map(|o| o.count).sum();
        assert_eq!(total, profile.populated_count);
        assert_eq!(profile.populated_count, 4);
        assert_eq!(profile.row_count, 6);
    }

    #[test]
    fn test_empty_column_is_unpopulated_not_inconsistent() {
        for values in [&[] as &[&str], &["", "", "  "]] {
            let profile = profile_of(values);
            assert_eq!(profile.dominant_category, None);
            assert_eq!(profile.dominant_fraction, 1.0);
            assert!(!profile.inconsistent);
            assert_eq!(profile.dominant_format_count(), 0);
        }
    }

    #[test]
    fn test_population_rate() {
        let profile = profile_of(&["x", "", "y", ""]);
        assert_eq!(profile.population_rate(), 0.5);

        let empty = profile_of(&[]);
        assert_eq!(empty.population_rate(), 0.0);
    }

    #[test]
    fn test_mixed_column_flagged_inconsistent() {
        // 3 of 5 emails: fraction 0.6 < 0.8
        let profile = profile_of(&["a@x.com", "b@y.com", "c@z.com", "hello", "world"]);

        assert_eq!(profile.dominant_category, Some(FormatCategory::Email));
        assert!((profile.dominant_fraction - 0.6).abs() < 1e-9);
        assert!(profile.inconsistent);

        let breakdown = profile.non_dominant();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, FormatCategory::Text);
        assert_eq!(breakdown[0].count, 2);
    }

    #[test]
    fn test_dominant_tie_breaks_by_priority() {
        // two emails, two text values: email wins the tie because it is
        // earlier in the priority order
        let profile = profile_of(&["a@x.com", "b@y.com", "hello", "world"]);
        assert_eq!(profile.dominant_category, Some(FormatCategory::Email));
    }

    #[test]
    fn test_threshold_monotonicity() {
        let values = &["a@x.com", "b@y.com", "c@z.com", "hello"];

        let lax = ColumnProfiler::with_threshold(0.5)
            .unwrap()
            .profile_values("c", values.iter().copied());
        let strict = ColumnProfiler::with_threshold(0.9)
            .unwrap()
            .profile_values("c", values.iter().copied());

        // fraction 0.75: consistent at 0.5, inconsistent at 0.9
        assert!(!lax.inconsistent);
        assert!(strict.inconsistent);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ColumnProfiler::with_threshold(0.0).is_err());
        assert!(ColumnProfiler::with_threshold(1.5).is_err());
        assert!(ColumnProfiler::with_threshold(1.0).is_ok());
    }

    #[test]
    fn test_three_date_layouts_give_three_formats() {
        let profile = profile_of(&["2024-01-05", "01/05/2024", "05-01-2024"]);

        assert_eq!(profile.dominant_category, Some(FormatCategory::Date));
        assert_eq!(profile.dominant_format_count(), 3);
        assert!(!profile.inconsistent);
    }

    #[test]
    fn test_profile_named() {
        let table = Table::from_columns(vec![(
            "emails",
            vec!["a@x.com".to_string(), "b@y.com".to_string()],
        )]);
        let profiler = ColumnProfiler::new();

        let profile = profiler.profile_named(&table, "emails").unwrap();
        assert_eq!(profile.name, "emails");
        assert!(profiler.profile_named(&table, "missing").is_err());
    }
}
