//! Detail-page extraction.

use centris_api::types::PropertyCategory;
use chrono::Utc;
use scraper::{ElementRef, Html};

use crate::listing::{Coordinates, Features, ListingRecord, MainUnitDetail};

use super::address::parse_address_line;
use super::financial::extract_financials;
use super::selectors::SelectorChain;
use super::summary::listing_id_from_url;
use super::{text, units};

const ROOT_SELECTORS: &[&str] = &[
    "main#property-detail",
    "div#overview",
    "div.property-detail",
];
const TITLE_SELECTORS: &[&str] = &[
    "span[data-id='PageTitle']",
    "h1[data-id='PageTitle']",
    "h1.property-title",
];
const ID_SELECTORS: &[&str] = &["span#ListingDisplayId", "div#ListingDisplayId"];
const PRICE_SELECTORS: &[&str] = &[
    "span#BuyPrice",
    "div.price-container span",
    "span[itemprop='price']",
];
const ADDRESS_SELECTORS: &[&str] = &[
    "h2[itemprop='address']",
    "div.address h2",
    "h2.property-address",
];
const LATITUDE_SELECTORS: &[&str] = &["span#PropertyLat", "input#PropertyLat"];
const LONGITUDE_SELECTORS: &[&str] = &["span#PropertyLng", "input#PropertyLng"];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "div[itemprop='description']",
    "div.property-description",
    "div.description",
];
const WALK_SCORE_SELECTORS: &[&str] = &["div.walkscore span", "div.walkscore", "span.walkscore"];
const PHOTO_SELECTORS: &[&str] = &[
    "div.photos img",
    "img[itemprop='image']",
    "div.primary-photo img",
];
const CARAC_CONTAINER_SELECTORS: &[&str] = &[
    "div.carac-container",
    "div.characteristic-item",
    "div.property-characteristic",
];
const CARAC_TITLE_SELECTORS: &[&str] = &[".carac-title", ".characteristic-title", "dt"];
const CARAC_VALUE_SELECTORS: &[&str] = &[".carac-value", ".characteristic-value", "dd"];

const UNITS_KEYS: &[&str] = &["residential units", "unites residentielles"];
const MAIN_UNIT_KEYS: &[&str] = &["main unit", "unite principale"];
const ROOMS_KEYS: &[&str] = &["number of rooms", "nombre de pieces", "pieces"];
const BEDROOMS_KEYS: &[&str] = &["bedroom", "chambre"];
const BATHROOMS_KEYS: &[&str] = &["bathroom", "salle de bain", "salles de bain"];
const YEAR_KEYS: &[&str] = &["year built", "annee de construction"];
const LOT_AREA_KEYS: &[&str] = &["lot area", "superficie du terrain"];
const PARKING_KEYS: &[&str] = &["parking", "stationnement"];

/// Extracts a full [`ListingRecord`] from a detail page.
///
/// Pages that are not listings (removed listing, error page) yield `None`.
/// Within a recognized listing, every field is optional: a gap in the
/// markup leaves the field absent instead of failing the extraction.
pub struct DetailExtractor {
    root: SelectorChain,
    titles: SelectorChain,
    ids: SelectorChain,
    prices: SelectorChain,
    addresses: SelectorChain,
    latitudes: SelectorChain,
    longitudes: SelectorChain,
    descriptions: SelectorChain,
    walk_scores: SelectorChain,
    photos: SelectorChain,
    carac_containers: SelectorChain,
    carac_titles: SelectorChain,
    carac_values: SelectorChain,
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailExtractor {
    pub fn new() -> Self {
        Self {
            root: SelectorChain::new(ROOT_SELECTORS),
            titles: SelectorChain::new(TITLE_SELECTORS),
            ids: SelectorChain::new(ID_SELECTORS),
            prices: SelectorChain::new(PRICE_SELECTORS),
            addresses: SelectorChain::new(ADDRESS_SELECTORS),
            latitudes: SelectorChain::new(LATITUDE_SELECTORS),
            longitudes: SelectorChain::new(LONGITUDE_SELECTORS),
            descriptions: SelectorChain::new(DESCRIPTION_SELECTORS),
            walk_scores: SelectorChain::new(WALK_SCORE_SELECTORS),
            photos: SelectorChain::new(PHOTO_SELECTORS),
            carac_containers: SelectorChain::new(CARAC_CONTAINER_SELECTORS),
            carac_titles: SelectorChain::new(CARAC_TITLE_SELECTORS),
            carac_values: SelectorChain::new(CARAC_VALUE_SELECTORS),
        }
    }

    /// Extracts the record, or `None` when the page carries no listing.
    pub fn extract(&self, html: &str, source_url: &str) -> Option<ListingRecord> {
        let document = Html::parse_document(html);
        let Some(root) = self.root.first(document.root_element()) else {
            tracing::debug!("No listing found at {}", source_url);
            return None;
        };

        let id = match self.listing_id(root, source_url) {
            Some(id) => id,
            None => {
                tracing::debug!("Listing at {} has no identifier", source_url);
                return None;
            }
        };

        let characteristics = self.characteristics(root);
        let title = self.titles.first_text(root);

        let units = find_characteristic(&characteristics, UNITS_KEYS)
            .map(|value| units::parse_unit_breakdown(&value))
            .unwrap_or_default();
        let main_unit = find_characteristic(&characteristics, MAIN_UNIT_KEYS)
            .map(|value| units::parse_main_unit_detail(&value))
            .unwrap_or_default();

        let price_text = self.prices.first_text(root);
        let record = ListingRecord {
            id,
            category: title.as_deref().and_then(PropertyCategory::from_label),
            status: title.as_deref().and_then(parse_status),
            source_url: source_url.to_string(),
            address: self
                .addresses
                .first_text(root)
                .map(|line| parse_address_line(&line))
                .unwrap_or_default(),
            coordinates: self.coordinates(root),
            financials: extract_financials(price_text.as_deref(), &characteristics),
            features: self.features(root, &characteristics, &main_unit),
            units,
            description: self.descriptions.first_text(root),
            photos: self.photo_urls(root),
            scraped_at: Utc::now(),
        };
        Some(record)
    }

    fn listing_id(&self, root: ElementRef<'_>, source_url: &str) -> Option<String> {
        if let Some(text) = self.ids.first_text(root) {
            if let Some(id) = text.split_whitespace().find(|w| w.chars().all(|c| c.is_ascii_digit()))
            {
                return Some(id.to_string());
            }
        }
        listing_id_from_url(source_url)
    }

    fn coordinates(&self, root: ElementRef<'_>) -> Option<Coordinates> {
        let latitude = self.coordinate_value(&self.latitudes, root)?;
        let longitude = self.coordinate_value(&self.longitudes, root)?;
        Some(Coordinates {
            latitude,
            longitude,
        })
    }

    fn coordinate_value(&self, chain: &SelectorChain, root: ElementRef<'_>) -> Option<f64> {
        let raw = chain
            .first_text(root)
            .or_else(|| chain.first_attr(root, "value"))?;
        raw.parse().ok()
    }

    fn features(
        &self,
        root: ElementRef<'_>,
        characteristics: &[(String, String)],
        main_unit: &MainUnitDetail,
    ) -> Features {
        let count = |keys| {
            find_characteristic(characteristics, keys)
                .as_deref()
                .and_then(text::parse_count)
        };
        Features {
            // Plex pages carry room counts in the main-unit sentence
            // rather than as standalone characteristics.
            rooms: count(ROOMS_KEYS).or(main_unit.rooms),
            bedrooms: count(BEDROOMS_KEYS).or(main_unit.bedrooms),
            bathrooms: count(BATHROOMS_KEYS).or(main_unit.bathrooms),
            year_built: find_characteristic(characteristics, YEAR_KEYS)
                .as_deref()
                .and_then(units::parse_year),
            lot_area: find_characteristic(characteristics, LOT_AREA_KEYS)
                .as_deref()
                .and_then(units::parse_area),
            parking_spaces: find_characteristic(characteristics, PARKING_KEYS)
                .as_deref()
                .and_then(units::parse_parking_total),
            walk_score: self
                .walk_scores
                .first_text(root)
                .as_deref()
                .and_then(units::parse_walk_score),
        }
    }

    fn characteristics(&self, root: ElementRef<'_>) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for container in self.carac_containers.all(root) {
            let title = self.carac_titles.first_text(container);
            let value = self.carac_values.first_text(container);
            if let (Some(title), Some(value)) = (title, value) {
                pairs.push((title, value));
            }
        }
        pairs
    }

    fn photo_urls(&self, root: ElementRef<'_>) -> Vec<String> {
        let mut photos: Vec<String> = Vec::new();
        for element in self.photos.all(root) {
            if let Some(src) = element.value().attr("src") {
                let src = src.trim();
                if !src.is_empty() && !photos.iter().any(|existing| existing == src) {
                    photos.push(src.to_string());
                }
            }
        }
        photos
    }
}

/// First characteristic whose title contains one of the given needles,
/// compared case- and accent-insensitively.
pub(crate) fn find_characteristic(
    characteristics: &[(String, String)],
    keys: &[&str],
) -> Option<String> {
    characteristics
        .iter()
        .find(|(title, _)| {
            let normalized = text::normalize_for_match(title);
            keys.iter().any(|key| normalized.contains(key))
        })
        .map(|(_, value)| value.clone())
}

fn parse_status(title: &str) -> Option<String> {
    let normalized = text::normalize_for_match(title);
    if normalized.contains("vendu") || normalized.contains("sold") {
        return Some("Sold".to_string());
    }
    if normalized.contains("a vendre") || normalized.contains("for sale") {
        return Some("For sale".to_string());
    }
    if normalized.contains("a louer") || normalized.contains("for rent") {
        return Some("For rent".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_bilingual_titles() {
        assert_eq!(
            parse_status("Triplex à vendre à Montréal").as_deref(),
            Some("For sale")
        );
        assert_eq!(
            parse_status("Duplex for sale in Laval").as_deref(),
            Some("For sale")
        );
        assert_eq!(parse_status("Condo vendu").as_deref(), Some("Sold"));
        assert_eq!(parse_status("Nos bureaux"), None);
    }

    #[test]
    fn characteristic_lookup_folds_accents() {
        let pairs = vec![
            ("Année de construction".to_string(), "1948".to_string()),
            ("Unités résidentielles".to_string(), "1 x 3 ½".to_string()),
        ];
        assert_eq!(
            find_characteristic(&pairs, &["annee de construction"]).as_deref(),
            Some("1948")
        );
        assert_eq!(
            find_characteristic(&pairs, &["residential units", "unites residentielles"]).as_deref(),
            Some("1 x 3 ½")
        );
        assert_eq!(find_characteristic(&pairs, &["lot area"]), None);
    }

    #[test]
    fn minimal_page_yields_record_with_gaps() {
        let html = r#"
<main id="property-detail">
  <span data-id="PageTitle">Duplex for sale in Laval</span>
</main>"#;
        let record = DetailExtractor::new()
            .extract(html, "https://portal.example/en/duplex/19302817")
            .unwrap();
        assert_eq!(record.id, "19302817");
        assert_eq!(record.category, Some(PropertyCategory::Plex));
        assert_eq!(record.status.as_deref(), Some("For sale"));
        assert_eq!(record.financials.price, None);
        assert!(record.units.is_empty());
        assert!(record.photos.is_empty());
        assert_eq!(record.coordinates, None);
    }

    #[test]
    fn non_listing_page_yields_none() {
        let html = "<html><body><div class='error'>Page not found</div></body></html>";
        assert!(DetailExtractor::new()
            .extract(html, "https://portal.example/en/gone/1")
            .is_none());
    }
}
