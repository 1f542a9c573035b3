//! Main cleaning pipeline module.
//!
//! This module provides the core `CleaningPipeline` struct and builder for
//! running the cleaning stages in their fixed order.

use crate::cleaner::{
    TypeCorrector, cap_monthly_premium_auto, clean_customer_lifetime_value, clean_education,
    clean_gender, clean_policy_type, clean_state_names, normalize_column_names,
    normalize_text_columns, remove_duplicates, remove_empty_rows_columns, rename_columns,
};
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::imputers::ConstantImputer;
use crate::pipeline::Stage;
use crate::types::{CleaningResult, CleaningSummary};
use crate::utils::total_missing_count;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, error, info};

/// The customer record cleaning pipeline.
///
/// Stateless: one pipeline can clean any number of tables, and a table is
/// moved through the stages without being shared.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{CleaningConfig, CleaningPipeline};
///
/// let result = CleaningPipeline::builder()
///     .config(CleaningConfig::builder().premium_cap(750.0).build()?)
///     .build()?
///     .process(dataframe)?;
///
/// println!("{} rows left", result.data.height());
/// ```
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    config: CleaningConfig,
    type_corrector: TypeCorrector,
    imputer: ConstantImputer,
}

// Tables may be cleaned on worker threads that share one pipeline.
static_assertions::assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a table and return only the cleaned data.
    pub fn clean(&self, df: DataFrame) -> Result<DataFrame> {
        self.process(df).map(|result| result.data)
    }

    /// Run every stage over `df`.
    ///
    /// Returns the cleaned table with its column kinds and an audit summary.
    ///
    /// # Errors
    ///
    /// Returns `Err(CleaningError::DuplicateColumn)` when two columns end up
    /// with the same name under the `Fail` collision policy. Other errors
    /// come from Polars or from a broken fill postcondition.
    pub fn process(&self, df: DataFrame) -> Result<CleaningResult> {
        match self.process_internal(df) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();

        info!("Starting cleaning pipeline...");

        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();

        let policy = self.config.name_collision;

        let stage = self.begin(Stage::NormalizeNames, &mut summary);
        let df = normalize_column_names(df, policy, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::RenameColumns, &mut summary);
        let df = rename_columns(df, policy, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::RemoveEmpty, &mut summary);
        let df = remove_empty_rows_columns(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::RemoveDuplicates, &mut summary);
        let df = remove_duplicates(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::NormalizeText, &mut summary);
        let df = normalize_text_columns(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CleanGender, &mut summary);
        let df = clean_gender(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CleanEducation, &mut summary);
        let df = clean_education(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CleanState, &mut summary);
        let df = clean_state_names(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CleanPolicyType, &mut summary);
        let df = clean_policy_type(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CapPremium, &mut summary);
        let df = cap_monthly_premium_auto(df, self.config.premium_cap, &mut summary)
            .context(stage.display_name())?;

        let stage = self.begin(Stage::CleanLifetimeValue, &mut summary);
        let df = clean_customer_lifetime_value(df, &mut summary).context(stage.display_name())?;

        let stage = self.begin(Stage::CoerceTypes, &mut summary);
        let table = self
            .type_corrector
            .correct_column_types(df, &mut summary)
            .context(stage.display_name())?;

        let stage = self.begin(Stage::FillMissing, &mut summary);
        debug!("{} missing cells before filling", total_missing_count(&table.frame));
        let table = self
            .imputer
            .fill_missing(table, &mut summary)
            .context(stage.display_name())?;

        debug_assert_eq!(summary.stages.as_slice(), Stage::ORDER.as_slice());

        // Finalize summary
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.rows_after = table.frame.height();
        summary.columns_after = table.frame.width();
        summary.column_kinds = table.kinds.clone();

        info!(
            "Cleaning complete: {} -> {} rows, {} -> {} columns in {} ms",
            summary.rows_before,
            summary.rows_after,
            summary.columns_before,
            summary.columns_after,
            summary.duration_ms
        );

        Ok(CleaningResult {
            data: table.frame,
            kinds: table.kinds,
            summary,
        })
    }

    /// Log the start of a stage and record it in the summary.
    fn begin(&self, stage: Stage, summary: &mut CleaningSummary) -> Stage {
        info!(
            "Step {}/{}: {}...",
            stage.index() + 1,
            Stage::ORDER.len(),
            stage.display_name()
        );
        summary.stages.push(stage);
        stage
    }
}

/// Builder for creating a [`CleaningPipeline`].
#[derive(Debug, Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleaningConfig>,
}

impl CleaningPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<CleaningPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        debug!("Building pipeline with config: {:?}", config);

        Ok(CleaningPipeline {
            type_corrector: TypeCorrector,
            imputer: ConstantImputer::new(config.numeric_fill, config.text_fill.clone()),
            config,
        })
    }
}
