//! Aggregate native balance of a collection's owners at a point in time.
//!
//! timestamp -> [`steps::resolve_height`] -> height -> [`steps::fetch_snapshot`]
//! -> owners -> [`pipeline::Pipeline::run`] -> [`epochval_common::AggregateReport`]

pub mod backpressure;
pub mod batch;
pub mod collaborators;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod settings;
pub mod steps;

#[cfg(test)]
pub mod testutils;

pub use error::{AggregatorError, Result};
pub use pipeline::Pipeline;
pub use settings::PipelineSettings;
pub use steps::EpochValuation;
