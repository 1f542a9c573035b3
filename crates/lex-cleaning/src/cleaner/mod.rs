//! Cleaning stages for customer record tables.
//!
//! This module provides functionality for:
//! - Normalizing and renaming column names
//! - Removing fully empty rows/columns and duplicate rows
//! - Trimming and lowercasing text
//! - Mapping categorical values to canonical spellings
//! - Capping premiums and parsing lifetime values
//! - Type correction and conversion
//!
//! Every stage takes the table by value and returns the transformed table,
//! recording what it did in a [`CleaningSummary`](crate::types::CleaningSummary).
//! A stage whose target column is absent is a no-op.

mod categorical;
mod converters;
mod names;
mod numeric;
mod sanitizers;
mod structure;
mod type_corrector;

pub use categorical::{
    CategoricalMap, EDUCATION, GENDER, POLICY_TYPE, STATE, clean_education, clean_gender,
    clean_policy_type, clean_state_names,
};
pub use names::{COLUMN_RENAMES, normalize_column_names, normalize_name, rename_columns};
pub use numeric::{
    LIFETIME_VALUE_COLUMN, MONTHLY_PREMIUM_COLUMN, cap_monthly_premium_auto,
    clean_customer_lifetime_value,
};
pub use sanitizers::normalize_text_columns;
pub use structure::{remove_duplicates, remove_empty_rows_columns};
pub use type_corrector::{Coercion, TypeCorrector};
