//! Text sanitization: trimming and lowercasing free-text columns.

use crate::error::Result;
use crate::types::{ActionType, CleaningAction, CleaningSummary, ColumnKind};
use crate::utils::column_names;
use polars::prelude::*;
use tracing::debug;

/// Trim and lowercase every non-missing value of every text column.
///
/// Numeric and temporal columns are left alone. Any other non-string column
/// (e.g. booleans) is treated as text and rendered to its string form first.
/// Missing values stay missing.
pub fn normalize_text_columns(mut df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    let mut normalized_cols = Vec::new();

    debug!("Trimming and lowercasing text columns...");

    for col_name in column_names(&df) {
        let series = df.column(&col_name)?.as_materialized_series().clone();
        if ColumnKind::of(series.dtype()) != ColumnKind::Text {
            continue;
        }

        let (cleaned, changed) = normalize_text_series(&series)?;
        df.replace(&col_name, cleaned)?;
        if changed > 0 {
            debug!("Normalized {} values in '{}'", changed, col_name);
            summary.add_action(CleaningAction::new(
                ActionType::TextNormalized,
                col_name.as_str(),
                changed,
                format!("Trimmed and lowercased {} values in '{}'", changed, col_name),
            ));
        }
        normalized_cols.push(col_name);
    }

    debug!("Text normalization covered {} columns", normalized_cols.len());
    Ok(df)
}

/// Trim and lowercase one series, returning it with the number of values
/// whose text changed.
pub(crate) fn normalize_text_series(series: &Series) -> Result<(Series, usize)> {
    let strings = series.cast(&DataType::String)?;
    let str_series = strings.str()?;
    let mut cleaned_values = Vec::with_capacity(str_series.len());
    let mut changed = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let cleaned = val.trim().to_lowercase();
                if cleaned != val {
                    changed += 1;
                }
                cleaned_values.push(Some(cleaned));
            }
            None => cleaned_values.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), cleaned_values), changed))
}
