//! Error types for the cleaning pipeline.
//!
//! The pipeline follows a "coerce, never fail" policy for data problems:
//! unparseable values and absent columns are not errors. The variants here
//! cover precondition violations (column name collisions), invalid
//! configuration, broken postconditions and failures surfaced by Polars.
//!
//! Errors are serializable as `{ code, message }` so a caller can forward
//! them to a UI or a JSON report unchanged.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Two source columns normalize to the same name.
    #[error("Column name '{name}' is produced by more than one source column: {sources:?}")]
    DuplicateColumn { name: String, sources: Vec<String> },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The missing-value filler left cells behind.
    #[error("Column '{column}' still has {count} missing values after filling")]
    MissingValuesRemain { column: String, count: usize },

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::MissingValuesRemain { .. } => "MISSING_VALUES_REMAIN",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is caused by the input rather than by the pipeline.
    ///
    /// A caller can fix these by changing the input table or the config.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::DuplicateColumn { .. } | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
