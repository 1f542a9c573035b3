//! Integration tests for the customer record cleaning pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline on CSV fixtures
//! loaded the same way the CLI loads its input.

use lex_cleaning::cleaner::{normalize_text_columns, remove_duplicates};
use lex_cleaning::{
    ActionType, CleaningConfig, CleaningError, CleaningPipeline, CleaningSummary, ColumnKind,
    NameCollisionPolicy, Stage,
};
use once_cell::sync::Lazy;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

static SNAKE_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").expect("Invalid regex: snake case"));

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn default_pipeline() -> CleaningPipeline {
    CleaningPipeline::builder()
        .build()
        .expect("Default config should be valid")
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.expect("no missing cells after cleaning").to_string())
        .collect()
}

fn floats(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.expect("no missing cells after cleaning"))
        .collect()
}

// ============================================================================
// Full Pipeline Tests with Customer Data
// ============================================================================

#[test]
fn test_full_pipeline_customer_dataset() {
    let df = load_csv("customers_raw.csv");
    assert_eq!(df.shape(), (13, 13));

    let result = default_pipeline().process(df).unwrap();
    let data = &result.data;

    // Empty row and the duplicate of AI49188 are gone, as is the empty Notes column.
    assert_eq!(data.shape(), (11, 12));
    assert_eq!(result.summary.rows_before, 13);
    assert_eq!(result.summary.rows_after, 11);
    assert_eq!(result.summary.rows_removed(), 2);
    assert_eq!(result.summary.columns_removed(), 1);

    assert_eq!(
        data.get_column_names_str(),
        vec![
            "customer",
            "state",
            "gender",
            "education",
            "customer_lifetime_value",
            "income",
            "monthly_premium_auto",
            "number_of_open_complaints",
            "policy_type",
            "vehicle_class",
            "total_claim_amount",
            "effective_to_date",
        ]
    );
}

#[test]
fn test_pipeline_leaves_no_missing_cells() {
    let result = default_pipeline()
        .process(load_csv("customers_raw.csv"))
        .unwrap();

    for col in result.data.get_columns() {
        assert_eq!(col.null_count(), 0, "column '{}' has missing cells", col.name());
    }

    let customers = strings(&result.data, "customer");
    let first = customers.iter().position(|c| c == "rb50392").unwrap();
    assert_eq!(strings(&result.data, "gender")[first], "unknown");
    assert_eq!(floats(&result.data, "customer_lifetime_value")[first], 0.0);
}

#[test]
fn test_pipeline_categorical_mappings() {
    let data = default_pipeline().clean(load_csv("customers_raw.csv")).unwrap();

    assert_eq!(
        strings(&data, "state"),
        vec![
            "washington", "arizona", "nevada", "california", "washington", "oregon", "oregon",
            "arizona", "oregon", "california", "arizona",
        ]
    );
    assert_eq!(
        strings(&data, "gender"),
        vec!["unknown", "f", "f", "m", "m", "f", "f", "m", "m", "f", "m"]
    );
    assert_eq!(
        strings(&data, "education"),
        vec![
            "master", "bachelor", "bachelor", "bachelor", "high school", "bachelor", "college",
            "master", "bachelor", "bachelor", "doctorate",
        ]
    );
    assert_eq!(
        strings(&data, "policy_type"),
        vec![
            "personal", "personal", "personal", "corporate", "personal", "personal", "corporate",
            "corporate", "corporate", "special", "special",
        ]
    );
}

#[test]
fn test_pipeline_numeric_cleanup() {
    let result = default_pipeline()
        .process(load_csv("customers_raw.csv"))
        .unwrap();
    let data = &result.data;

    let premiums = floats(data, "monthly_premium_auto");
    assert_eq!(premiums[0], 1000.0);
    assert_eq!(premiums[9], 1000.0);
    assert!(premiums.iter().all(|&p| p <= 1000.0));

    let clv = floats(data, "customer_lifetime_value");
    assert_eq!(clv[1], 697953.59);
    assert_eq!(clv[9], 12.5);
    assert_eq!(clv[10], 0.0);

    assert_eq!(data.column("income").unwrap().dtype(), &DataType::Int64);
    assert_eq!(floats(data, "income")[10], 0.0);
    assert_eq!(floats(data, "total_claim_amount")[10], 0.0);

    let capped: Vec<_> = result.summary.actions_of(ActionType::ValueCapped).collect();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].count, 1);
}

#[test]
fn test_pipeline_column_kinds() {
    let result = default_pipeline()
        .process(load_csv("customers_raw.csv"))
        .unwrap();

    assert_eq!(result.kinds.get("income"), Some(ColumnKind::Numeric));
    assert_eq!(result.kinds.get("customer_lifetime_value"), Some(ColumnKind::Numeric));
    assert_eq!(result.kinds.get("monthly_premium_auto"), Some(ColumnKind::Numeric));
    assert_eq!(result.kinds.get("effective_to_date"), Some(ColumnKind::Temporal));
    assert_eq!(result.kinds.get("state"), Some(ColumnKind::Text));
    // "1/0/00" is not a valid date, so the column stays text.
    assert_eq!(result.kinds.get("number_of_open_complaints"), Some(ColumnKind::Text));

    assert!(matches!(
        result.data.column("effective_to_date").unwrap().dtype(),
        DataType::Datetime(TimeUnit::Milliseconds, None)
    ));
    assert_eq!(result.kinds.len(), result.data.width());
}

#[test]
fn test_pipeline_summary_serializes() {
    let result = default_pipeline()
        .process(load_csv("customers_raw.csv"))
        .unwrap();

    assert_eq!(result.summary.stages, Stage::ORDER.to_vec());

    let json = serde_json::to_string(&result.summary).unwrap();
    let parsed: CleaningSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.rows_after, 11);
    assert_eq!(parsed.column_kinds, result.kinds);
    assert!(json.contains("\"duplicates_removed\""));
    assert!(json.contains("\"fill_missing\""));
}

// ============================================================================
// Invariant Tests
// ============================================================================

#[test]
fn test_normalized_names_are_snake_case() {
    let df = df!(
        " Policy Type " => &["Personal Auto"],
        "Customer  Lifetime--Value%" => &["5%"],
        "__Income__" => &[1i64],
        "???" => &["x"],
    )
    .unwrap();

    let data = default_pipeline().clean(df).unwrap();
    let names = data.get_column_names_str();

    assert_eq!(
        names,
        vec!["policy_type", "customer_lifetime_value", "income", "column_3"]
    );
    for name in names {
        assert!(SNAKE_CASE.is_match(name), "'{}' is not snake case", name);
    }
    assert_eq!(strings(&data, "policy_type"), vec!["personal"]);
}

#[test]
fn test_only_st_is_renamed() {
    let df = df!("ST" => &["WA"], "Stat" => &["x"], "Sta te" => &["y"]).unwrap();
    let data = default_pipeline().clean(df).unwrap();

    assert_eq!(data.get_column_names_str(), vec!["state", "stat", "sta_te"]);
    assert_eq!(strings(&data, "state"), vec!["washington"]);
}

#[test]
fn test_clean_data_is_idempotent() {
    let df = load_csv("clean_customers.csv");
    let pipeline = default_pipeline();

    let once = pipeline.clean(df.clone()).unwrap();
    assert!(once.equals_missing(&df), "clean data changed:\n{}\n{}", df, once);

    let twice = pipeline.clean(once.clone()).unwrap();
    assert!(twice.equals_missing(&once));
}

#[test]
fn test_duplicates_keep_first_occurrence() {
    let df = df!(
        "Customer" => &["A", "B", "A", "C", "B"],
        "Income" => &[1i64, 2, 1, 3, 2],
    )
    .unwrap();

    let data = default_pipeline().clean(df).unwrap();
    assert_eq!(strings(&data, "customer"), vec!["a", "b", "c"]);
}

#[test]
fn test_whitespace_variants_collapse_after_text_normalization() {
    let df = df!(
        "state" => &["Arizona", "Arizona ", "Oregon"],
        "income" => &[10i64, 10, 20],
    )
    .unwrap();

    let mut summary = CleaningSummary::new();
    let df = normalize_text_columns(df, &mut summary).unwrap();
    let df = remove_duplicates(df, &mut summary).unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(strings(&df, "state"), vec!["arizona", "oregon"]);
}

#[test]
fn test_whitespace_variants_survive_full_pipeline() {
    // Deduplication runs before text normalization in the fixed order.
    let df = df!(
        "state" => &["Arizona", "Arizona ", "Oregon"],
        "income" => &[10i64, 10, 20],
    )
    .unwrap();

    let data = default_pipeline().clean(df).unwrap();
    assert_eq!(strings(&data, "state"), vec!["arizona", "arizona", "oregon"]);
}

#[test]
fn test_empty_rows_and_columns_removed() {
    let df = df!(
        "a" => &[Some(1i64), None, Some(3)],
        "b" => &[Some("x"), None, None],
        "c" => &[None::<&str>, None, None],
    )
    .unwrap();

    let result = default_pipeline().process(df).unwrap();

    assert_eq!(result.data.shape(), (2, 2));
    assert_eq!(result.data.get_column_names_str(), vec!["a", "b"]);
    assert_eq!(strings(&result.data, "b"), vec!["x", "unknown"]);
    assert_eq!(result.summary.actions_of(ActionType::RowsRemoved).count(), 1);
    assert_eq!(result.summary.actions_of(ActionType::ColumnRemoved).count(), 1);
}

#[test]
fn test_nan_cells_are_missing() {
    let df = df!(
        "Total Claim Amount" => &[Some(1.5), Some(f64::NAN), Some(f64::NAN)],
        "Income" => &[Some(2.0), None, Some(5.0)],
    )
    .unwrap();

    let result = default_pipeline().process(df).unwrap();

    assert_eq!(result.data.height(), 2);
    assert_eq!(floats(&result.data, "total_claim_amount"), vec![1.5, 0.0]);
    assert_eq!(floats(&result.data, "income"), vec![2.0, 5.0]);
    assert_eq!(result.summary.actions_of(ActionType::RowsRemoved).count(), 1);
    assert_eq!(result.summary.actions_of(ActionType::ValueImputed).count(), 1);
}

#[test]
fn test_absent_target_columns_are_noops() {
    let df = df!("Name" => &["Ann", "Bob"], "Age" => &[30i64, 41]).unwrap();
    let result = default_pipeline().process(df).unwrap();

    assert_eq!(strings(&result.data, "name"), vec!["ann", "bob"]);
    assert_eq!(result.summary.actions_of(ActionType::ValueMapped).count(), 0);
    assert_eq!(result.summary.actions_of(ActionType::ValueCapped).count(), 0);
    assert!(result.summary.warnings.is_empty());
}

#[test]
fn test_boolean_columns_are_treated_as_text() {
    let df = df!("Active" => &[Some(true), None, Some(false)]).unwrap();
    let result = default_pipeline().process(df).unwrap();

    assert_eq!(strings(&result.data, "active"), vec!["true", "unknown", "false"]);
    assert_eq!(result.kinds.get("active"), Some(ColumnKind::Text));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_colliding_columns_fail_by_default() {
    let err = default_pipeline()
        .process(load_csv("colliding_columns.csv"))
        .unwrap_err();

    assert_eq!(err.error_code(), "DUPLICATE_COLUMN");
    assert!(err.is_input_error());
    let message = err.to_string();
    assert!(message.contains("Customer ID"));
    assert!(message.contains("customer_id"));
}

#[test]
fn test_colliding_columns_suffix_policy() {
    let config = CleaningConfig::builder()
        .name_collision(NameCollisionPolicy::Suffix)
        .build()
        .unwrap();
    let data = CleaningPipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .clean(load_csv("colliding_columns.csv"))
        .unwrap();

    assert_eq!(
        data.get_column_names_str(),
        vec!["customer_id", "customer_id_2", "income"]
    );
}

#[test]
fn test_state_rename_collision() {
    let err = default_pipeline()
        .process(load_csv("state_abbreviation.csv"))
        .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_COLUMN");

    let config = CleaningConfig::builder()
        .name_collision(NameCollisionPolicy::Suffix)
        .build()
        .unwrap();
    let data = CleaningPipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .clean(load_csv("state_abbreviation.csv"))
        .unwrap();
    assert_eq!(data.get_column_names_str(), vec!["customer", "state_2", "state"]);
}

#[test]
fn test_invalid_config_rejected() {
    let config = CleaningConfig {
        text_fill: String::new(),
        ..CleaningConfig::default()
    };
    let err = CleaningPipeline::builder().config(config).build().unwrap_err();
    assert!(matches!(err, CleaningError::InvalidConfig(_)));
}

#[test]
fn test_non_numeric_premium_is_skipped_with_warning() {
    let df = df!("Monthly Premium Auto" => &["61", "lots"]).unwrap();
    let result = default_pipeline().process(df).unwrap();

    assert_eq!(strings(&result.data, "monthly_premium_auto"), vec!["61", "lots"]);
    assert_eq!(result.summary.warnings.len(), 1);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_custom_premium_cap() {
    let config = CleaningConfig::builder().premium_cap(100.0).build().unwrap();
    let data = CleaningPipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .clean(load_csv("customers_raw.csv"))
        .unwrap();

    assert!(floats(&data, "monthly_premium_auto").iter().all(|&p| p <= 100.0));
}

#[test]
fn test_pipeline_shared_across_threads() {
    let pipeline = Arc::new(default_pipeline());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                pipeline
                    .clean(load_csv("customers_raw.csv"))
                    .map(|df| df.height())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 11);
    }
}
