//! Structural cleanup: fully empty rows and columns, duplicate rows.

use crate::error::Result;
use crate::types::{ActionType, CleaningAction, CleaningSummary};
use crate::utils::{column_names, is_float_dtype, missing_count, nan_to_null};
use polars::prelude::*;
use tracing::{debug, info};

/// Drop rows where every cell is missing, then columns where every
/// remaining cell is missing.
///
/// Float NaN is missing too and is turned into null here, so later stages
/// only ever see nulls. Column emptiness is judged on the rows that survive
/// the row pass. A table with no rows keeps its columns.
pub fn remove_empty_rows_columns(
    df: DataFrame,
    summary: &mut CleaningSummary,
) -> Result<DataFrame> {
    let df = nulls_for_nan(df)?;
    let df = remove_empty_rows(df, summary)?;
    remove_empty_columns(df, summary)
}

fn nulls_for_nan(mut df: DataFrame) -> Result<DataFrame> {
    for name in column_names(&df) {
        let series = df.column(&name)?.as_materialized_series();
        if !is_float_dtype(series.dtype()) || missing_count(series) == series.null_count() {
            continue;
        }
        let cleaned = nan_to_null(series)?;
        debug!("'{}': NaN values marked as missing", name);
        df.replace(&name, cleaned)?;
    }
    Ok(df)
}

fn remove_empty_rows(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(df);
    }

    let mut keep = BooleanChunked::full("keep".into(), false, df.height());
    for col in df.get_columns() {
        let not_null = col.as_materialized_series().is_not_null();
        keep = &keep | &not_null;
    }

    let before = df.height();
    let df = df.filter(&keep)?;
    let removed = before - df.height();

    if removed > 0 {
        info!("Removed {} fully empty rows", removed);
        summary.add_action(CleaningAction::new(
            ActionType::RowsRemoved,
            "dataset",
            removed,
            format!("Removed {} fully empty rows", removed),
        ));
    } else {
        debug!("No fully empty rows found");
    }

    Ok(df)
}

fn remove_empty_columns(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let empty_cols: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|col| col.null_count() == col.len())
        .map(|col| col.name().clone())
        .collect();

    if empty_cols.is_empty() {
        debug!("No fully empty columns found");
        return Ok(df);
    }

    let removed: Vec<String> = empty_cols.iter().map(|s| s.to_string()).collect();
    let df = df.drop_many(empty_cols);

    info!("Removed {} fully empty columns: {:?}", removed.len(), removed);
    for name in &removed {
        summary.add_action(CleaningAction::new(
            ActionType::ColumnRemoved,
            name.as_str(),
            1,
            format!("Removed fully empty column '{}'", name),
        ));
    }

    Ok(df)
}

/// Drop rows that exactly repeat an earlier row across all columns.
///
/// The first occurrence is kept and survivors keep their relative order.
/// Missing cells compare equal to each other.
pub fn remove_duplicates(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
    if df.width() == 0 || df.height() < 2 {
        return Ok(df);
    }

    let before = df.height();
    let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = before - df.height();

    if removed > 0 {
        let pct = (removed as f64 / before as f64) * 100.0;
        info!("Removed {} duplicate rows ({:.1}%)", removed, pct);
        summary.add_action(CleaningAction::new(
            ActionType::DuplicatesRemoved,
            "dataset",
            removed,
            format!("Removed {} duplicate rows ({:.1}%)", removed, pct),
        ));
    } else {
        debug!("No duplicate rows found");
    }

    Ok(df)
}
