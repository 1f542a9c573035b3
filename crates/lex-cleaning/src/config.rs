//! Configuration types for the cleaning pipeline.
//!
//! The stage order is fixed; configuration only tunes the constants the
//! stages apply (premium cap, fill values) and the column name collision
//! policy.

use serde::{Deserialize, Serialize};

/// Default cap applied to `monthly_premium_auto`.
pub const DEFAULT_PREMIUM_CAP: f64 = 1000.0;

/// Default fill for missing cells in numeric columns.
pub const DEFAULT_NUMERIC_FILL: f64 = 0.0;

/// Default fill for missing cells in every non-numeric column.
pub const DEFAULT_TEXT_FILL: &str = "unknown";

/// What to do when two columns end up with the same normalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NameCollisionPolicy {
    /// Return [`CleaningError::DuplicateColumn`](crate::error::CleaningError::DuplicateColumn).
    #[default]
    Fail,
    /// Append `_2`, `_3`, ... to later occurrences.
    Suffix,
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] for a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::config::{CleaningConfig, NameCollisionPolicy};
///
/// let config = CleaningConfig::builder()
///     .premium_cap(750.0)
///     .name_collision(NameCollisionPolicy::Suffix)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Upper bound for `monthly_premium_auto`. Values strictly above are
    /// replaced by this value.
    /// Default: 1000.0
    pub premium_cap: f64,

    /// Value substituted for missing cells in numeric columns.
    /// Default: 0.0
    pub numeric_fill: f64,

    /// Value substituted for missing cells in text and temporal columns.
    /// Default: "unknown"
    pub text_fill: String,

    /// Policy for duplicate names after normalization or renaming.
    /// Default: Fail
    pub name_collision: NameCollisionPolicy,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            premium_cap: DEFAULT_PREMIUM_CAP,
            numeric_fill: DEFAULT_NUMERIC_FILL,
            text_fill: DEFAULT_TEXT_FILL.to_string(),
            name_collision: NameCollisionPolicy::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.premium_cap.is_finite() || self.premium_cap < 0.0 {
            return Err(ConfigValidationError::InvalidPremiumCap(self.premium_cap));
        }

        if !self.numeric_fill.is_finite() {
            return Err(ConfigValidationError::InvalidNumericFill(self.numeric_fill));
        }

        if self.text_fill.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTextFill);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid premium cap: {0} (must be a finite, non-negative number)")]
    InvalidPremiumCap(f64),

    #[error("Invalid numeric fill: {0} (must be finite)")]
    InvalidNumericFill(f64),

    #[error("Text fill value must not be empty")]
    EmptyTextFill,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    premium_cap: Option<f64>,
    numeric_fill: Option<f64>,
    text_fill: Option<String>,
    name_collision: Option<NameCollisionPolicy>,
}

impl CleaningConfigBuilder {
    /// Set the cap for `monthly_premium_auto`.
    pub fn premium_cap(mut self, cap: f64) -> Self {
        self.premium_cap = Some(cap);
        self
    }

    /// Set the fill value for missing numeric cells.
    pub fn numeric_fill(mut self, value: f64) -> Self {
        self.numeric_fill = Some(value);
        self
    }

    /// Set the fill value for missing non-numeric cells.
    pub fn text_fill(mut self, value: impl Into<String>) -> Self {
        self.text_fill = Some(value.into());
        self
    }

    /// Set the column name collision policy.
    pub fn name_collision(mut self, policy: NameCollisionPolicy) -> Self {
        self.name_collision = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            premium_cap: self.premium_cap.unwrap_or(DEFAULT_PREMIUM_CAP),
            numeric_fill: self.numeric_fill.unwrap_or(DEFAULT_NUMERIC_FILL),
            text_fill: self
                .text_fill
                .unwrap_or_else(|| DEFAULT_TEXT_FILL.to_string()),
            name_collision: self.name_collision.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
