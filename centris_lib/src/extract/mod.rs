//! HTML extraction.
//!
//! Result pages are reduced to [`crate::listing::ListingSummary`] cards by
//! [`SummaryExtractor`]; detail pages become full
//! [`crate::listing::ListingRecord`]s through [`DetailExtractor`]. Both
//! address the markup through [`selectors::SelectorChain`] fallbacks, and
//! share the localized text parsers in [`text`] and [`units`].

mod address;
mod detail;
mod financial;
pub mod selectors;
mod summary;
pub mod text;
pub mod units;

pub use self::address::parse_address_line;
pub use self::detail::DetailExtractor;
pub use self::summary::SummaryExtractor;
