//! Library layer for the Centris portal: search pipeline, HTML extraction,
//! and result validation.
//!
//! Wraps the `centris_api` session crate with listing extractors for result
//! and detail pages, a first-page validator that catches silently dropped
//! queries, and a paginating search pipeline that ties the three together.

pub mod config;
pub mod error;
pub mod extract;
pub mod listing;
pub mod pipeline;
pub mod validate;

pub use centris_api;
pub use centris_api::types;
pub use centris_api::{PriceRange, SearchQuery, SearchQueryBuilder};

pub use config::{PipelineConfig, DEFAULT_VALIDATION_THRESHOLD};
pub use error::PipelineError;
pub use extract::{DetailExtractor, SummaryExtractor};
pub use listing::{
    Address, Coordinates, Features, Financials, ListingRecord, ListingSummary, MainUnitDetail,
    UnitBreakdown, UnitSize,
};
pub use pipeline::{PageStream, SearchPipeline, SummaryPage};
pub use validate::{ResultValidator, Verdict};
