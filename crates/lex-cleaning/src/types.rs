use crate::pipeline::Stage;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Column kinds
// ============================================================================

/// The kind a column is treated as by the cleaning stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Free text. Every column that is neither numeric nor temporal.
    Text,
    /// Dates, datetimes and times.
    Temporal,
}

impl ColumnKind {
    /// Derive the kind from a Polars dtype.
    pub fn of(dtype: &DataType) -> Self {
        if crate::utils::is_numeric_dtype(dtype) {
            Self::Numeric
        } else if crate::utils::is_temporal_dtype(dtype) {
            Self::Temporal
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Temporal => "temporal",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a single column, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnKindEntry {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered per-column kind tags.
///
/// Computed once by type coercion and carried alongside the data so the
/// missing-value filler does not need to re-inspect dtypes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnKinds(Vec<ColumnKindEntry>);

impl ColumnKinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every column of `df` by its current dtype.
    pub fn from_frame(df: &DataFrame) -> Self {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), ColumnKind::of(col.dtype())))
            .collect()
    }

    pub fn push(&mut self, name: impl Into<String>, kind: ColumnKind) {
        self.0.push(ColumnKindEntry {
            name: name.into(),
            kind,
        });
    }

    /// Kind of a column, if the column is known.
    pub fn get(&self, name: &str) -> Option<ColumnKind> {
        self.0
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.kind)
    }

    /// Re-tag a known column. Unknown names are ignored.
    pub fn set(&mut self, name: &str, kind: ColumnKind) {
        if let Some(entry) = self.0.iter_mut().find(|entry| entry.name == name) {
            entry.kind = kind;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnKindEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnKind)> for ColumnKinds {
    fn from_iter<I: IntoIterator<Item = (S, ColumnKind)>>(iter: I) -> Self {
        let mut kinds = ColumnKinds::new();
        for (name, kind) in iter {
            kinds.push(name, kind);
        }
        kinds
    }
}

/// A table paired with the kind tags produced by type coercion.
#[derive(Debug, Clone)]
pub struct TypedTable {
    pub frame: DataFrame,
    pub kinds: ColumnKinds,
}

// ============================================================================
// Cleaning summary
// ============================================================================

/// Audit trail of a pipeline run.
///
/// Every stage appends the actions it took; the pipeline fills in the
/// shape counters and timing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,

    /// Stages in the order they ran.
    pub stages: Vec<Stage>,

    /// Actions taken, in order.
    pub actions: Vec<CleaningAction>,

    /// Final kind of every column.
    pub column_kinds: ColumnKinds,

    /// Non-fatal notes, e.g. a best-effort step that was skipped.
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    pub fn columns_removed(&self) -> usize {
        self.columns_before.saturating_sub(self.columns_after)
    }

    /// All actions of one type.
    pub fn actions_of(&self, action_type: ActionType) -> impl Iterator<Item = &CleaningAction> {
        self.actions
            .iter()
            .filter(move |action| action.action_type == action_type)
    }
}

/// A single action taken during cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name, or "dataset" for table-wide actions.
    pub target: String,
    pub description: String,
    /// Number of cells, rows or columns affected.
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        count: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            count,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Types of actions that can be taken during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A column was renamed.
    ColumnRenamed,
    /// Fully empty rows were removed.
    RowsRemoved,
    /// A fully empty column was removed.
    ColumnRemoved,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// Text values were trimmed and lowercased.
    TextNormalized,
    /// Categorical values were mapped to canonical spellings.
    ValueMapped,
    /// Values above a cap were replaced by the cap.
    ValueCapped,
    /// Values were parsed and invalid ones dropped to missing.
    ValueCleaned,
    /// A column's type was reinterpreted.
    TypeCorrected,
    /// Missing values were filled.
    ValueImputed,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnRenamed => "Column Renamed",
            Self::RowsRemoved => "Rows Removed",
            Self::ColumnRemoved => "Column Removed",
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::TextNormalized => "Text Normalized",
            Self::ValueMapped => "Value Mapped",
            Self::ValueCapped => "Value Capped",
            Self::ValueCleaned => "Value Cleaned",
            Self::TypeCorrected => "Type Corrected",
            Self::ValueImputed => "Value Imputed",
        }
    }
}

/// Output of [`CleaningPipeline::process`](crate::CleaningPipeline::process).
#[derive(Debug, Clone)]
pub struct CleaningResult {
    /// The cleaned table. No cell is missing.
    pub data: DataFrame,
    /// Kind of every column of `data`.
    pub kinds: ColumnKinds,
    pub summary: CleaningSummary,
}
