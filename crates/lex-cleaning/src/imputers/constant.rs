//! Constant imputation: every missing cell gets a fixed value by column kind.

use crate::error::{CleaningError, Result};
use crate::types::{ActionType, CleaningAction, CleaningSummary, ColumnKind, TypedTable};
use crate::utils::{
    fill_integer_nulls, fill_numeric_nulls, fill_string_nulls, is_integer_dtype, missing_count,
    nan_to_null,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Fills missing cells with a numeric constant or a text constant.
///
/// The fill value is chosen from the kind tags carried by the
/// [`TypedTable`], never from the current dtype.
#[derive(Debug, Clone)]
pub struct ConstantImputer {
    numeric_fill: f64,
    text_fill: String,
}

impl ConstantImputer {
    pub fn new(numeric_fill: f64, text_fill: impl Into<String>) -> Self {
        Self {
            numeric_fill,
            text_fill: text_fill.into(),
        }
    }

    /// Fill every missing cell of the table.
    ///
    /// Numeric columns receive the numeric fill; integer columns stay `Int64`
    /// when the fill is integral. Text columns receive the text fill. Temporal
    /// columns with gaps are rendered to text and re-tagged as text.
    ///
    /// Fails with [`CleaningError::MissingValuesRemain`] if any cell is still
    /// missing afterwards.
    pub fn fill_missing(
        &self,
        table: TypedTable,
        summary: &mut CleaningSummary,
    ) -> Result<TypedTable> {
        let TypedTable { mut frame, mut kinds } = table;
        let mut retagged = Vec::new();

        for entry in kinds.iter() {
            let series = frame.column(&entry.name)?.as_materialized_series().clone();
            let missing = missing_count(&series);
            if missing == 0 {
                continue;
            }

            let (filled, fill_desc) = match entry.kind {
                ColumnKind::Numeric => (self.fill_numeric(&series)?, self.numeric_fill.to_string()),
                ColumnKind::Text => (
                    fill_string_nulls(&nan_to_null(&series)?, &self.text_fill)?,
                    format!("'{}'", self.text_fill),
                ),
                ColumnKind::Temporal => {
                    retagged.push(entry.name.clone());
                    (
                        fill_string_nulls(&series, &self.text_fill)?,
                        format!("'{}'", self.text_fill),
                    )
                }
            };

            frame.replace(&entry.name, filled)?;
            debug!("Filled {} missing values in '{}' with {}", missing, entry.name, fill_desc);
            summary.add_action(
                CleaningAction::new(
                    ActionType::ValueImputed,
                    entry.name.as_str(),
                    missing,
                    format!("Filled {} missing values with {}", missing, fill_desc),
                )
                .with_details(format!("{} column", entry.kind)),
            );
        }

        for name in retagged {
            debug!("Temporal column '{}' rendered as text to hold the fill value", name);
            kinds.set(&name, ColumnKind::Text);
        }

        Self::verify_complete(&frame)?;
        info!("Missing value handling complete");

        Ok(TypedTable { frame, kinds })
    }

    fn fill_numeric(&self, series: &Series) -> Result<Series> {
        let integral_fill = self.numeric_fill.fract() == 0.0
            && self.numeric_fill >= i64::MIN as f64
            && self.numeric_fill <= i64::MAX as f64;

        if is_integer_dtype(series.dtype()) && integral_fill {
            match fill_integer_nulls(series, self.numeric_fill as i64) {
                Ok(filled) => return Ok(filled),
                Err(e) => {
                    debug!("'{}' does not fit Int64 ({}), filling as Float64", series.name(), e)
                }
            }
        }
        Ok(fill_numeric_nulls(series, self.numeric_fill)?)
    }

    fn verify_complete(df: &DataFrame) -> Result<()> {
        for col in df.get_columns() {
            let missing = missing_count(col.as_materialized_series());
            if missing > 0 {
                return Err(CleaningError::MissingValuesRemain {
                    column: col.name().to_string(),
                    count: missing,
                });
            }
        }
        Ok(())
    }
}
