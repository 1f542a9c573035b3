//! Column-specific numeric cleanup.

use super::converters::{coerce_numeric, parse_percent_numbers};
use crate::error::Result;
use crate::types::{ActionType, CleaningAction, CleaningSummary};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::{debug, info, warn};

pub const MONTHLY_PREMIUM_COLUMN: &str = "monthly_premium_auto";
pub const LIFETIME_VALUE_COLUMN: &str = "customer_lifetime_value";

/// Replace `monthly_premium_auto` values strictly above `cap` with `cap`.
///
/// The column is capped as `Float64`. A text column is first reinterpreted
/// as numbers; when that fails the stage leaves the column untouched.
pub fn cap_monthly_premium_auto(
    mut df: DataFrame,
    cap: f64,
    summary: &mut CleaningSummary,
) -> Result<DataFrame> {
    let Ok(col) = df.column(MONTHLY_PREMIUM_COLUMN) else {
        debug!("Column '{}' not present, skipping cap", MONTHLY_PREMIUM_COLUMN);
        return Ok(df);
    };
    let series = col.as_materialized_series().clone();

    let numeric = if is_numeric_dtype(series.dtype()) {
        series
    } else if let Some(coerced) = coerce_numeric(&series)? {
        coerced
    } else {
        warn!(
            "Column '{}' is not numeric ({:?}); premium cap skipped",
            MONTHLY_PREMIUM_COLUMN,
            series.dtype()
        );
        summary.add_warning(format!(
            "'{}' could not be read as numbers; premium cap skipped",
            MONTHLY_PREMIUM_COLUMN
        ));
        return Ok(df);
    };

    let floats = numeric.cast(&DataType::Float64)?;
    let mut capped = 0;
    let values: Vec<Option<f64>> = floats
        .f64()?
        .into_iter()
        .map(|opt_val| {
            opt_val.map(|v| {
                if v > cap {
                    capped += 1;
                    cap
                } else {
                    v
                }
            })
        })
        .collect();

    df.replace(
        MONTHLY_PREMIUM_COLUMN,
        Series::new(MONTHLY_PREMIUM_COLUMN.into(), values),
    )?;

    if capped > 0 {
        info!("Capped {} values of '{}' at {}", capped, MONTHLY_PREMIUM_COLUMN, cap);
        summary.add_action(
            CleaningAction::new(
                ActionType::ValueCapped,
                MONTHLY_PREMIUM_COLUMN,
                capped,
                format!("Capped {} values above {}", capped, cap),
            )
            .with_details(format!("cap = {}", cap)),
        );
    }

    Ok(df)
}

/// Parse `customer_lifetime_value` as numbers, dropping `%` signs.
///
/// Values that do not parse become missing; they are filled later like any
/// other missing numeric cell.
pub fn clean_customer_lifetime_value(
    mut df: DataFrame,
    summary: &mut CleaningSummary,
) -> Result<DataFrame> {
    let Ok(col) = df.column(LIFETIME_VALUE_COLUMN) else {
        debug!("Column '{}' not present, skipping parse", LIFETIME_VALUE_COLUMN);
        return Ok(df);
    };

    let (parsed, invalid) = parse_percent_numbers(col.as_materialized_series())?;
    df.replace(LIFETIME_VALUE_COLUMN, parsed)?;

    if invalid > 0 {
        warn!(
            "{} values of '{}' could not be parsed and are now missing",
            invalid, LIFETIME_VALUE_COLUMN
        );
        summary.add_action(CleaningAction::new(
            ActionType::ValueCleaned,
            LIFETIME_VALUE_COLUMN,
            invalid,
            format!("Set {} unparseable values to missing", invalid),
        ));
    }

    Ok(df)
}
