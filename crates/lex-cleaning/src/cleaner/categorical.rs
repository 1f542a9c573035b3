//! Fixed lookup tables that map known spellings to canonical values.
//!
//! Matching is exact and case-sensitive, so text normalization must run
//! first. Unmapped values pass through unchanged.

use crate::error::Result;
use crate::types::{ActionType, CleaningAction, CleaningSummary};
use polars::prelude::*;
use tracing::debug;

/// A lookup table bound to one column.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalMap {
    pub column: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl CategoricalMap {
    /// Canonical value for `value`, if the table knows it.
    pub fn lookup(&self, value: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(from, _)| *from == value)
            .map(|(_, to)| *to)
    }

    /// Apply the table to its column.
    ///
    /// No-op when the column is absent or is not a string column.
    pub fn apply(&self, mut df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
        let Ok(col) = df.column(self.column) else {
            debug!("Column '{}' not present, skipping mapping", self.column);
            return Ok(df);
        };

        let series = col.as_materialized_series();
        if series.dtype() != &DataType::String {
            debug!(
                "Column '{}' is {:?}, not text; skipping mapping",
                self.column,
                series.dtype()
            );
            return Ok(df);
        }

        let str_series = series.str()?;
        let mut mapped = 0;
        let values: Vec<Option<String>> = str_series
            .into_iter()
            .map(|opt_val| {
                opt_val.map(|val| match self.lookup(val) {
                    Some(canonical) => {
                        if canonical != val {
                            mapped += 1;
                        }
                        canonical.to_string()
                    }
                    None => val.to_string(),
                })
            })
            .collect();

        df.replace(self.column, Series::new(self.column.into(), values))?;

        if mapped > 0 {
            debug!("Mapped {} values in '{}'", mapped, self.column);
            summary.add_action(CleaningAction::new(
                ActionType::ValueMapped,
                self.column,
                mapped,
                format!("Mapped {} values in '{}' to canonical spellings", mapped, self.column),
            ));
        }

        Ok(df)
    }
}

pub const GENDER: CategoricalMap = CategoricalMap {
    column: "gender",
    entries: &[
        ("male", "m"),
        ("m", "m"),
        ("female", "f"),
        ("f", "f"),
        ("femal", "f"),
    ],
};

pub const EDUCATION: CategoricalMap = CategoricalMap {
    column: "education",
    entries: &[
        ("master", "master"),
        ("bachelor", "bachelor"),
        ("bachelors", "bachelor"),
        ("high school or below", "high school"),
        ("college", "college"),
        ("doctor", "doctorate"),
    ],
};

/// Partial abbreviation table; other abbreviations are kept as-is.
pub const STATE: CategoricalMap = CategoricalMap {
    column: "state",
    entries: &[("az", "arizona"), ("wa", "washington"), ("cali", "california")],
};

pub const POLICY_TYPE: CategoricalMap = CategoricalMap {
    column: "policy_type",
    entries: &[
        ("personal auto", "personal"),
        ("corporate auto", "corporate"),
        ("special auto", "special"),
    ],
};

pub fn clean_gender(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    GENDER.apply(df, summary)
}

pub fn clean_education(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    EDUCATION.apply(df, summary)
}

pub fn clean_state_names(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    STATE.apply(df, summary)
}

pub fn clean_policy_type(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    POLICY_TYPE.apply(df, summary)
}
