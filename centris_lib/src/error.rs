//! Error types for the pipeline layer.

use thiserror::Error;

use crate::validate::Verdict;

/// Errors from running the search pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A session-level failure from the backend client.
    #[error("Backend request failed: {0}")]
    Api(#[from] centris_api::Error),
    /// The first result page did not look like the submitted query, so the
    /// backend most likely dropped the query and fell back to a default
    /// search.
    #[error(
        "first page failed validation (location ratio {:.2}, category ratio {:.2})",
        .0.location_ratio,
        .0.category_ratio
    )]
    ValidationRejected(Verdict),
}
