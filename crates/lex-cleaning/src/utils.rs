//! Shared utilities for the cleaning stages.
//!
//! Small helpers used by several stages, kept here so every stage parses
//! numbers and fills nulls the same way.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Int128
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal(_, _)
    )
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !is_float_dtype(dtype) && !matches!(dtype, DataType::Decimal(_, _))
}

/// Check if a DataType is a floating point type, the only kind that can hold NaN.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a date, datetime or time type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Column names of a DataFrame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Total number of missing cells in a DataFrame.
pub fn total_missing_count(df: &DataFrame) -> usize {
    df.get_columns()
        .iter()
        .map(|col| missing_count(col.as_materialized_series()))
        .sum()
}

/// Number of missing cells in a Series. Float NaN counts as missing.
pub fn missing_count(series: &Series) -> usize {
    let nan_count = match series.dtype() {
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        _ => 0,
    };
    series.null_count() + nan_count
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Parse a trimmed string as a finite number.
///
/// Empty strings and textual infinities/NaN are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::utils::parse_finite_number;
///
/// assert_eq!(parse_finite_number(" 12.5 "), Some(12.5));
/// assert_eq!(parse_finite_number("nan"), None);
/// ```
pub fn parse_finite_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a trimmed string as an integer.
///
/// Accepts a leading sign; rejects decimal points and exponents.
pub fn parse_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Replace NaN with null in a float Series. Other dtypes are returned as is.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    let cleaned = match series.dtype() {
        DataType::Float32 => series
            .f32()?
            .into_iter()
            .map(|opt| opt.filter(|v| !v.is_nan()))
            .collect::<Float32Chunked>()
            .into_series(),
        DataType::Float64 => series
            .f64()?
            .into_iter()
            .map(|opt| opt.filter(|v| !v.is_nan()))
            .collect::<Float64Chunked>()
            .into_series(),
        _ => return Ok(series.clone()),
    };

    Ok(cleaned.with_name(series.name().clone()))
}

/// Fill null and NaN values in a numeric Series, producing Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let result: Vec<f64> = floats
        .f64()?
        .into_iter()
        .map(|opt| opt.filter(|v| !v.is_nan()).unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), result))
}

/// Fill null values in an integer Series, producing Int64.
///
/// Fails instead of truncating when a value does not fit in `i64`.
pub fn fill_integer_nulls(series: &Series, fill_value: i64) -> PolarsResult<Series> {
    let ints = series.strict_cast(&DataType::Int64)?;
    let result: Vec<i64> = ints
        .i64()?
        .into_iter()
        .map(|opt| opt.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), result))
}

/// Fill null values in a Series with a string, producing a String Series.
///
/// Non-string values are rendered with Polars' string cast first.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let strings = series.cast(&DataType::String)?;
    let result: Vec<String> = strings
        .str()?
        .into_iter()
        .map(|opt| opt.unwrap_or(fill_value).to_string())
        .collect();

    Ok(Series::new(series.name().clone(), result))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(is_numeric_dtype(&DataType::Int128));
        assert!(is_numeric_dtype(&DataType::Decimal(Some(10), Some(2))));
    }

    #[test]
    fn test_is_integer_dtype() {
        assert!(is_integer_dtype(&DataType::Int32));
        assert!(is_integer_dtype(&DataType::UInt8));
        assert!(!is_integer_dtype(&DataType::Float64));
        assert!(!is_integer_dtype(&DataType::String));
        assert!(is_integer_dtype(&DataType::Int128));
        assert!(!is_integer_dtype(&DataType::Decimal(Some(10), Some(2))));
    }

    #[test]
    fn test_is_temporal_dtype() {
        assert!(is_temporal_dtype(&DataType::Date));
        assert!(is_temporal_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(!is_temporal_dtype(&DataType::String));
    }

    #[test]
    fn test_parse_finite_number() {
        assert_eq!(parse_finite_number("42"), Some(42.0));
        assert_eq!(parse_finite_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_finite_number("1e3"), Some(1000.0));
        assert_eq!(parse_finite_number(""), None);
        assert_eq!(parse_finite_number("nan"), None);
        assert_eq!(parse_finite_number("inf"), None);
        assert_eq!(parse_finite_number("12,5"), None);
        assert_eq!(parse_finite_number("hello"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("4.0"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_nulls_treats_nan_as_missing() {
        let series = Series::new("test".into(), &[Some(1.5), Some(f64::NAN), None]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.5), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_nan_to_null() {
        let series = Series::new("x".into(), &[Some(2.0f32), Some(f32::NAN), None]);
        let cleaned = nan_to_null(&series).unwrap();

        assert_eq!(cleaned.name().as_str(), "x");
        assert_eq!(cleaned.dtype(), &DataType::Float32);
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(missing_count(&series), 2);

        let text = Series::new("t".into(), &["nan"]);
        assert_eq!(nan_to_null(&text).unwrap().null_count(), 0);
    }

    #[test]
    fn test_fill_integer_nulls_rejects_overflow() {
        let series = Series::new("big".into(), &[Some(u64::MAX), None]);
        assert!(fill_integer_nulls(&series, 0).is_err());
    }

    #[test]
    fn test_fill_integer_nulls_keeps_int64() {
        let series = Series::new("test".into(), &[Some(5i32), None]);
        let filled = fill_integer_nulls(&series, 0).unwrap();

        assert_eq!(filled.dtype(), &DataType::Int64);
        assert_eq!(filled.get(1).unwrap().try_extract::<i64>().unwrap(), 0);
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("test".into(), &[Some("a"), None, Some("c")]);
        let filled = fill_string_nulls(&series, "unknown").unwrap();

        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("a"), Some("unknown"), Some("c")]);
    }

    #[test]
    fn test_total_missing_count() {
        let df = df!(
            "a" => &[Some(1i64), None],
            "b" => &[None::<&str>, None],
            "c" => &[f64::NAN, 1.0],
        )
        .unwrap();
        assert_eq!(total_missing_count(&df), 4);
        assert_eq!(
            column_names(&df),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
