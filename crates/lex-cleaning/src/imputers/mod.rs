//! Imputation module for handling missing values.
//!
//! Missing cells are filled with constants chosen by column kind.

mod constant;

pub use constant::ConstantImputer;
