//! Pipeline module.
//!
//! This module provides the cleaning pipeline and its fixed stage order.

mod builder;
mod stage;

pub use builder::{CleaningPipeline, CleaningPipelineBuilder};
pub use stage::Stage;
