//! Warning and issue types for quality reports.

use serde::{Deserialize, Serialize};

/// Kind of quality warning attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Column has no populated values at all.
    EmptyField,
    /// Column is sparsely or moderately populated.
    LowPopulation,
    /// Multiple sub-formats of the dominant category coexist.
    InconsistentFormat,
    /// Incompatible format categories mixed in one column.
    MixedTypes,
}

impl WarningKind {
    /// Get a human-readable label for the warning kind.
    pub fn label(&self) -> &'static str {
        match self {
            WarningKind::EmptyField => "Empty Field",
            WarningKind::LowPopulation => "Low Population",
            WarningKind::InconsistentFormat => "Inconsistent Format",
            WarningKind::MixedTypes => "Mixed Types",
        }
    }
}

/// Severity level of a warning or issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, rarely urgent.
    Low,
    /// Should be reviewed.
    Medium,
    /// Definite problem.
    High,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// A quality warning about one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Kind of issue.
    pub kind: WarningKind,
    /// Severity level.
    pub severity: Severity,
    /// Affected column name.
    pub column: String,
    /// Human-readable description.
    pub message: String,
    /// Example values illustrating the issue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl Warning {
    /// Create a new warning.
    pub fn new(
        kind: WarningKind,
        severity: Severity,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            column: column.into(),
            message: message.into(),
            examples: Vec::new(),
        }
    }

    /// Attach example values.
    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

/// A dataset-wide issue that is not tied to a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalIssue {
    /// Machine-readable issue type.
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Severity level.
    pub severity: Severity,
}
