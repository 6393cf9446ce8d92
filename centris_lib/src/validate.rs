//! Result-page validation.
//!
//! The portal's query endpoint silently falls back to a default search when
//! a payload stops matching what the backend expects, and the fallback still
//! returns a plausible page of cards. The only reliable tell is the cards
//! themselves: if they do not look like the query, the query was dropped.
//! The validator scores the first page against the query on two independent
//! axes, location and category, and rejects when either falls short.

use centris_api::types::SearchArea;
use centris_api::SearchQuery;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_VALIDATION_THRESHOLD;
use crate::extract::text::normalize_for_match;
use crate::listing::ListingSummary;

/// Outcome of validating one result page against the query that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Whether both ratios met the threshold.
    pub accepted: bool,
    /// Share of summaries whose city or region matches a queried area.
    pub location_ratio: f64,
    /// Share of summaries whose category matches a queried category.
    pub category_ratio: f64,
}

/// Scores result pages against the query that produced them.
#[derive(Clone, Copy, Debug)]
pub struct ResultValidator {
    threshold: f64,
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATION_THRESHOLD)
    }
}

impl ResultValidator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores the summaries against the query. An empty page is rejected
    /// outright: the portal answers an honoured query with cards, so an
    /// empty first page after a submission means the query was dropped.
    pub fn validate(&self, summaries: &[ListingSummary], query: &SearchQuery) -> Verdict {
        if summaries.is_empty() {
            return Verdict {
                accepted: false,
                location_ratio: 0.0,
                category_ratio: 0.0,
            };
        }

        let total = summaries.len() as f64;
        let location_matches = summaries
            .iter()
            .filter(|summary| matches_any_area(summary, query.areas()))
            .count() as f64;
        let category_matches = summaries
            .iter()
            .filter(|summary| {
                summary
                    .category
                    .map(|category| query.categories().contains(&category))
                    .unwrap_or(false)
            })
            .count() as f64;

        let location_ratio = location_matches / total;
        let category_ratio = category_matches / total;
        Verdict {
            accepted: location_ratio >= self.threshold && category_ratio >= self.threshold,
            location_ratio,
            category_ratio,
        }
    }
}

fn matches_any_area(summary: &ListingSummary, areas: &[SearchArea]) -> bool {
    let fields = [summary.city.as_deref(), summary.region.as_deref()];
    areas.iter().any(|area| {
        let wanted = normalize_for_match(area.display_name());
        fields.iter().flatten().any(|field| {
            let seen = normalize_for_match(field);
            // Cards abbreviate ("Montréal (Rosemont)" vs "Rosemont"), so a
            // containment either way counts as a match.
            seen.contains(&wanted) || wanted.contains(&seen)
        })
    })
}
