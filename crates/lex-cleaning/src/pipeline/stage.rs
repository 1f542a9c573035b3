//! The fixed sequence of cleaning stages.

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Snake-case every column name.
    NormalizeNames,
    /// Apply the fixed rename table (`st` to `state`).
    RenameColumns,
    /// Drop fully empty rows, then fully empty columns.
    RemoveEmpty,
    /// Drop exact duplicate rows, keeping the first.
    RemoveDuplicates,
    /// Trim and lowercase text columns.
    NormalizeText,
    CleanGender,
    CleanEducation,
    CleanState,
    CleanPolicyType,
    /// Cap `monthly_premium_auto`.
    CapPremium,
    /// Parse `customer_lifetime_value`.
    CleanLifetimeValue,
    /// Reinterpret text columns as numbers or datetimes.
    CoerceTypes,
    /// Fill every missing cell.
    FillMissing,
}

impl Stage {
    /// Every stage in execution order.
    pub const ORDER: [Stage; 13] = [
        Stage::NormalizeNames,
        Stage::RenameColumns,
        Stage::RemoveEmpty,
        Stage::RemoveDuplicates,
        Stage::NormalizeText,
        Stage::CleanGender,
        Stage::CleanEducation,
        Stage::CleanState,
        Stage::CleanPolicyType,
        Stage::CapPremium,
        Stage::CleanLifetimeValue,
        Stage::CoerceTypes,
        Stage::FillMissing,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NormalizeNames => "Normalizing Column Names",
            Self::RenameColumns => "Renaming Columns",
            Self::RemoveEmpty => "Removing Empty Rows and Columns",
            Self::RemoveDuplicates => "Removing Duplicates",
            Self::NormalizeText => "Normalizing Text",
            Self::CleanGender => "Cleaning Gender",
            Self::CleanEducation => "Cleaning Education",
            Self::CleanState => "Cleaning State Names",
            Self::CleanPolicyType => "Cleaning Policy Type",
            Self::CapPremium => "Capping Monthly Premium",
            Self::CleanLifetimeValue => "Cleaning Lifetime Value",
            Self::CoerceTypes => "Correcting Types",
            Self::FillMissing => "Filling Missing Values",
        }
    }

    /// Zero-based position in [`Stage::ORDER`].
    pub fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|stage| stage == self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
