//! Type coercion: reinterpret text columns as numbers or datetimes.

use super::converters::{coerce_numeric, coerce_temporal};
use crate::error::Result;
use crate::types::{
    ActionType, CleaningAction, CleaningSummary, ColumnKind, ColumnKinds, TypedTable,
};
use crate::utils::column_names;
use polars::prelude::*;
use tracing::debug;

/// Outcome of coercing a single column.
#[derive(Debug, Clone)]
pub enum Coercion {
    /// Every non-missing value parsed as a number.
    Numeric(Series),
    /// Every non-missing value parsed as a datetime under one format.
    Temporal(Series),
    /// The column keeps its values and dtype.
    Unchanged,
}

impl Coercion {
    /// Kind of the column after applying this outcome to `original`.
    pub fn kind(&self, original: &Series) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Temporal(_) => ColumnKind::Temporal,
            Self::Unchanged => ColumnKind::of(original.dtype()),
        }
    }
}

/// Type corrector for converting text columns to their proper data types.
///
/// Coercion is all-or-nothing per column and never fails on data: a column
/// with a single unparseable value stays as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCorrector;

impl TypeCorrector {
    /// Coerce every column and tag each with its resulting kind.
    pub fn correct_column_types(
        &self,
        mut df: DataFrame,
        summary: &mut CleaningSummary,
    ) -> Result<TypedTable> {
        let mut kinds = ColumnKinds::new();

        debug!("Analyzing column types for corrections...");

        for col_name in column_names(&df) {
            let series = df.column(&col_name)?.as_materialized_series().clone();
            let coercion = self.coerce_column(&series)?;
            let kind = coercion.kind(&series);

            match coercion {
                Coercion::Numeric(corrected) | Coercion::Temporal(corrected) => {
                    let message = format!(
                        "Corrected '{}' from {:?} to {:?}",
                        col_name,
                        series.dtype(),
                        corrected.dtype()
                    );
                    debug!("  {}", message);
                    summary.add_action(CleaningAction::new(
                        ActionType::TypeCorrected,
                        col_name.as_str(),
                        series.len() - series.null_count(),
                        message,
                    ));
                    df.replace(&col_name, corrected)?;
                }
                Coercion::Unchanged => {
                    debug!("  '{}' kept as {:?}", col_name, series.dtype());
                }
            }

            kinds.push(col_name, kind);
        }

        Ok(TypedTable { frame: df, kinds })
    }

    /// Decide the outcome for one column: numeric first, then temporal.
    pub fn coerce_column(&self, series: &Series) -> Result<Coercion> {
        if series.dtype() != &DataType::String {
            return Ok(Coercion::Unchanged);
        }

        if let Some(numeric) = coerce_numeric(series)? {
            return Ok(Coercion::Numeric(numeric));
        }

        if let Some(temporal) = coerce_temporal(series)? {
            return Ok(Coercion::Temporal(temporal));
        }

        Ok(Coercion::Unchanged)
    }
}
