//! Value converters shared by the numeric cleanup and type coercion stages.
//!
//! All converters are best-effort: they report failure through their return
//! value and never through an error. Errors are reserved for Polars failures.

use crate::error::Result;
use crate::utils::{parse_finite_number, parse_integer};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// How a temporal format is parsed.
#[derive(Debug, Clone, Copy)]
enum TemporalFormat {
    Rfc3339,
    DateTime(&'static str),
    Date(&'static str),
}

/// Formats tried in order. A column must parse entirely under one of them.
const TEMPORAL_FORMATS: &[TemporalFormat] = &[
    TemporalFormat::Rfc3339,
    TemporalFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    TemporalFormat::DateTime("%Y-%m-%dT%H:%M:%S"),
    TemporalFormat::Date("%Y-%m-%d"),
    // Two-digit years first: `%Y` would read "11" as the year 11.
    TemporalFormat::Date("%m/%d/%y"),
    TemporalFormat::Date("%m/%d/%Y"),
    TemporalFormat::Date("%d.%m.%Y"),
];

impl TemporalFormat {
    /// Milliseconds since the Unix epoch, or None if `value` does not match.
    fn parse_millis(&self, value: &str) -> Option<i64> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.timestamp_millis()),
            Self::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.and_utc().timestamp_millis()),
            Self::Date(fmt) => NaiveDate::parse_from_str(value, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis()),
        }
    }
}

/// Reinterpret a string series as numbers.
///
/// Returns `Int64` when every non-missing value is an integer, `Float64` when
/// every non-missing value is a finite number, and `None` otherwise. Series
/// that are not strings, or that hold no values at all, are never coerced.
pub(crate) fn coerce_numeric(series: &Series) -> Result<Option<Series>> {
    if series.dtype() != &DataType::String || series.null_count() == series.len() {
        return Ok(None);
    }
    let str_series = series.str()?;

    let ints: Option<Vec<Option<i64>>> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) => parse_integer(val).map(Some),
            None => Some(None),
        })
        .collect();
    if let Some(ints) = ints {
        return Ok(Some(Series::new(series.name().clone(), ints)));
    }

    let floats: Option<Vec<Option<f64>>> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) => parse_finite_number(val).map(Some),
            None => Some(None),
        })
        .collect();

    Ok(floats.map(|floats| Series::new(series.name().clone(), floats)))
}

/// Reinterpret a string series as `Datetime(ms)`.
///
/// Every non-missing value must parse under the same format from
/// [`TEMPORAL_FORMATS`]; otherwise returns `None`.
pub(crate) fn coerce_temporal(series: &Series) -> Result<Option<Series>> {
    if series.dtype() != &DataType::String || series.null_count() == series.len() {
        return Ok(None);
    }
    let str_series = series.str()?;

    for format in TEMPORAL_FORMATS {
        // Values arrive lowercased; the formats expect an upper-case `T`/`Z`.
        let millis: Option<Vec<Option<i64>>> = str_series
            .into_iter()
            .map(|opt_val| match opt_val {
                Some(val) => format.parse_millis(&val.trim().to_uppercase()).map(Some),
                None => Some(None),
            })
            .collect();

        if let Some(millis) = millis {
            let timestamps = Series::new(series.name().clone(), millis);
            let datetimes =
                timestamps.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            return Ok(Some(datetimes));
        }
    }

    Ok(None)
}

/// Parse lifetime-value style numbers: string form, `%` removed, trimmed.
///
/// Values that do not parse become missing. Returns the `Float64` series and
/// the number of non-missing inputs that were dropped.
pub(crate) fn parse_percent_numbers(series: &Series) -> Result<(Series, usize)> {
    let strings = series.cast(&DataType::String)?;
    let str_series = strings.str()?;
    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());
    let mut invalid = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let cleaned = val.replace('%', "");
                let parsed = parse_finite_number(&cleaned);
                if parsed.is_none() {
                    invalid += 1;
                }
                result_vec.push(parsed);
            }
            None => result_vec.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), result_vec), invalid))
}
