//! Thumbnail-card extraction from result pages.

use std::sync::OnceLock;

use centris_api::types::PropertyCategory;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::listing::ListingSummary;

use super::address::split_city_line;
use super::selectors::SelectorChain;
use super::text;

const CONTAINER_SELECTORS: &[&str] = &[
    "div.property-thumbnail-item",
    "div.thumbnailItem",
    "article.property-summary",
];
const LINK_SELECTORS: &[&str] = &[
    "a.property-thumbnail-summary-link",
    "a.property-link",
    "a[href]",
];
const ID_SELECTORS: &[&str] = &["meta[itemprop='sku']", "[data-listing-id]"];
const CATEGORY_SELECTORS: &[&str] = &["span.category div", "span.category", "div.property-type"];
const PRICE_SELECTORS: &[&str] = &["div.price span.price-value", "div.price span", "span.price"];
const CITY_SELECTORS: &[&str] = &[
    "span.address div.city",
    "div.address div.locality",
    "p.address-city",
];
const RESULT_COUNT_SELECTORS: &[&str] = &[
    "span.results-nb span.result-count",
    "span.results-nb",
    "div.results-count",
];

/// Extracts [`ListingSummary`] cards from a result page.
///
/// Extraction is pure: the same HTML always yields the same summaries, in
/// document order. Cards missing an identifier are dropped; any other
/// missing field is just `None` on the summary.
pub struct SummaryExtractor {
    containers: SelectorChain,
    links: SelectorChain,
    ids: SelectorChain,
    categories: SelectorChain,
    prices: SelectorChain,
    cities: SelectorChain,
    result_count: SelectorChain,
    base_url: Option<String>,
}

impl Default for SummaryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryExtractor {
    pub fn new() -> Self {
        Self {
            containers: SelectorChain::new(CONTAINER_SELECTORS),
            links: SelectorChain::new(LINK_SELECTORS),
            ids: SelectorChain::new(ID_SELECTORS),
            categories: SelectorChain::new(CATEGORY_SELECTORS),
            prices: SelectorChain::new(PRICE_SELECTORS),
            cities: SelectorChain::new(CITY_SELECTORS),
            result_count: SelectorChain::new(RESULT_COUNT_SELECTORS),
            base_url: None,
        }
    }

    /// Base URL used to absolutize relative detail links.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Replaces the card-container chain. The usual fix when the portal
    /// renames its thumbnail markup.
    pub fn with_container_selectors(mut self, sources: &[&str]) -> Self {
        self.containers = SelectorChain::new(sources);
        self
    }

    /// Extracts every summary card on the page, in document order.
    pub fn extract(&self, html: &str) -> Vec<ListingSummary> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut summaries = Vec::new();
        for card in self.containers.all(root) {
            match self.extract_card(card) {
                Some(summary) => summaries.push(summary),
                None => tracing::debug!("Skipping card without a listing id"),
            }
        }
        summaries
    }

    /// Total size of the result set as printed in the page header.
    pub fn result_count(&self, html: &str) -> Option<u32> {
        let document = Html::parse_document(html);
        self.result_count
            .first_text(document.root_element())
            .as_deref()
            .and_then(parse_result_count)
    }

    fn extract_card(&self, card: ElementRef<'_>) -> Option<ListingSummary> {
        let href = self.links.first_attr(card, "href");
        let id = self.card_id(card, href.as_deref())?;
        let detail_url = href.as_deref().map(|h| self.absolutize(h));
        let (city, region) = match self.cities.first_text(card) {
            Some(line) => split_city_line(&line),
            None => (None, None),
        };

        Some(ListingSummary {
            id,
            detail_url,
            category: self
                .categories
                .first_text(card)
                .as_deref()
                .and_then(PropertyCategory::from_label),
            price: self
                .prices
                .first_text(card)
                .as_deref()
                .and_then(text::parse_money),
            city,
            region,
        })
    }

    fn card_id(&self, card: ElementRef<'_>, href: Option<&str>) -> Option<String> {
        if let Some(id) = attr_id(card) {
            return Some(id);
        }
        if let Some(element) = self.ids.first(card) {
            if let Some(id) = attr_id(element) {
                return Some(id);
            }
        }
        href.and_then(listing_id_from_url)
    }

    fn absolutize(&self, href: &str) -> String {
        match (&self.base_url, href.starts_with('/')) {
            (Some(base), true) => format!("{}{}", base, href),
            _ => href.to_string(),
        }
    }
}

fn attr_id(element: ElementRef<'_>) -> Option<String> {
    for attr in ["data-listing-id", "content"] {
        if let Some(value) = element.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Pulls the listing id out of a detail URL, e.g.
/// "/en/triplex~a-vendre~montreal/28191476" or its absolute form.
pub(crate) fn listing_id_from_url(href: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d{5,})/?(?:\?.*)?$").unwrap());
    re.captures(href).map(|cap| cap[1].to_string())
}

fn parse_result_count(raw: &str) -> Option<u32> {
    // "1 234 results" keeps its thousands separator; strip it first.
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || c.is_whitespace() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
