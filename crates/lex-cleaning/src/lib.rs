//! Customer Record Cleaning Library
//!
//! A data-cleaning pipeline for customer/insurance record tables, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! The pipeline applies a fixed sequence of stages to an in-memory
//! [`DataFrame`](polars::prelude::DataFrame):
//!
//! - **Column Names**: snake_case normalization, then `st` becomes `state`
//! - **Structural Cleanup**: fully empty rows/columns and duplicate rows are removed
//! - **Text Normalization**: text values are trimmed and lowercased
//! - **Categorical Mapping**: gender, education, state and policy type spellings
//! - **Numeric Cleanup**: `monthly_premium_auto` is capped, `customer_lifetime_value` parsed
//! - **Type Correction**: text columns become numbers or datetimes when every value parses
//! - **Missing Values**: numeric cells get `0`, everything else gets `"unknown"`
//!
//! Unparseable values and absent columns are never errors; the affected
//! stage simply leaves them alone. The library performs no I/O.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::CleaningPipeline;
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("customers.csv".into()))?
//!     .finish()?;
//!
//! let result = CleaningPipeline::builder().build()?.process(df)?;
//!
//! println!("Rows: {} -> {}", result.summary.rows_before, result.summary.rows_after);
//! for entry in result.kinds.iter() {
//!     println!("{}: {}", entry.name, entry.kind);
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] to tune the constants the stages apply:
//!
//! ```rust,ignore
//! use lex_cleaning::{CleaningConfig, NameCollisionPolicy};
//!
//! let config = CleaningConfig::builder()
//!     .premium_cap(750.0)                          // Cap monthly_premium_auto at 750
//!     .text_fill("n/a")                            // Fill for non-numeric cells
//!     .name_collision(NameCollisionPolicy::Suffix) // income, income_2, ...
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{Coercion, TypeCorrector};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError, NameCollisionPolicy};
pub use error::{CleaningError, ResultExt};
pub use imputers::ConstantImputer;
pub use pipeline::{CleaningPipeline, CleaningPipelineBuilder, Stage};
pub use types::{
    ActionType, CleaningAction, CleaningResult, CleaningSummary, ColumnKind, ColumnKindEntry,
    ColumnKinds, TypedTable,
};
