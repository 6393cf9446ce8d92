//! Listing data model: summaries from result pages and full records from
//! detail pages.

use std::collections::BTreeMap;

use centris_api::types::PropertyCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One thumbnail card from a result page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    /// Listing identifier as printed on the card or in its detail link.
    pub id: String,
    /// Absolute or page-relative link to the detail page.
    pub detail_url: Option<String>,
    /// Category derived from the card label, when recognized.
    pub category: Option<PropertyCategory>,
    /// Asking price in whole dollars.
    pub price: Option<i64>,
    /// City part of the card address line.
    pub city: Option<String>,
    /// Neighbourhood or borough part of the card address line.
    pub region: Option<String>,
}

/// Street address of a listing, split into its printed parts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
}

/// Geographic position of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Financial figures, in whole dollars. Absent figures stay `None` rather
/// than defaulting to zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    /// Asking price.
    pub price: Option<i64>,
    /// Annual municipal tax.
    pub municipal_tax: Option<i64>,
    /// Annual school tax.
    pub school_tax: Option<i64>,
    /// Municipal assessment of the property.
    pub assessment: Option<i64>,
    /// Potential gross revenue, for revenue properties.
    pub gross_revenue: Option<i64>,
}

/// Physical characteristics of a listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    /// Room count of the property, or of its main unit for a plex.
    pub rooms: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub year_built: Option<i32>,
    /// Lot area as printed, with the unit suffix stripped.
    pub lot_area: Option<u64>,
    /// Total parking spaces across driveways and garages.
    pub parking_spaces: Option<u32>,
    /// Walk Score, 0 to 100.
    pub walk_score: Option<u32>,
}

/// Room counts for the main unit of a revenue property, parsed from a
/// sentence like "5 pièces, 3 chambres, 1 salle de bain".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainUnitDetail {
    pub rooms: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

/// Size class of a dwelling, counted in half-rooms: a 4½ is nine
/// half-rooms. Keeping the count integral makes the type hashable and
/// totally ordered, which map keys need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitSize(u16);

impl UnitSize {
    /// Builds a size from a whole-room count and the ½ marker.
    pub fn new(rooms: u16, has_half: bool) -> Self {
        Self(rooms.saturating_mul(2).saturating_add(has_half as u16))
    }

    pub fn from_half_rooms(half_rooms: u16) -> Self {
        Self(half_rooms)
    }

    /// Whole rooms, excluding the half.
    pub fn rooms(&self) -> u16 {
        self.0 / 2
    }

    pub fn has_half(&self) -> bool {
        self.0 % 2 == 1
    }

    /// Numeric form: a 4½ is 4.5.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl std::fmt::Display for UnitSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_half() {
            write!(f, "{}½", self.rooms())
        } else {
            write!(f, "{}", self.rooms())
        }
    }
}

impl Serialize for UnitSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Stable ASCII form for map keys: "4.5", "9".
        serializer.collect_str(&format_args!("{}", self.as_f64()))
    }
}

impl<'de> Deserialize<'de> for UnitSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let value: f64 = raw
            .parse()
            .map_err(|_| serde::de::Error::custom("unit size must be numeric"))?;
        let doubled = value * 2.0;
        if doubled < 0.0 || doubled > f64::from(u16::MAX) || doubled.fract() != 0.0 {
            return Err(serde::de::Error::custom(
                "unit size must be a non-negative half-room multiple",
            ));
        }
        Ok(UnitSize::from_half_rooms(doubled as u16))
    }
}

/// Mix of dwelling sizes in a revenue property.
///
/// The total is derived from the per-size counts on demand, so the two can
/// never disagree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitBreakdown {
    counts: BTreeMap<UnitSize, u32>,
}

impl UnitBreakdown {
    /// Adds `count` dwellings of the given size, accumulating with any
    /// already recorded for that size. Counts saturate at `u32::MAX`.
    pub fn add(&mut self, size: UnitSize, count: u32) {
        let entry = self.counts.entry(size).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Dwellings of exactly this size.
    pub fn count(&self, size: UnitSize) -> u32 {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    /// Total dwellings across all sizes, saturating at `u32::MAX`.
    pub fn total_units(&self) -> u32 {
        self.counts
            .values()
            .fold(0, |total, count| total.saturating_add(*count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Sizes and counts in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitSize, u32)> + '_ {
        self.counts.iter().map(|(size, count)| (*size, *count))
    }
}

impl Serialize for UnitBreakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("UnitBreakdown", 2)?;
        state.serialize_field("counts", &self.counts)?;
        state.serialize_field("totalUnits", &self.total_units())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for UnitBreakdown {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // The serialized totalUnits is ignored; the counts are the only
        // source of truth.
        #[derive(Deserialize)]
        struct Raw {
            counts: BTreeMap<UnitSize, u32>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(UnitBreakdown { counts: raw.counts })
    }
}

/// Full record extracted from a detail page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Listing identifier.
    pub id: String,
    /// Category derived from the page title, when recognized.
    pub category: Option<PropertyCategory>,
    /// Sale status as printed in the page title ("For sale", "Sold").
    pub status: Option<String>,
    /// URL the record was extracted from.
    pub source_url: String,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    pub financials: Financials,
    pub features: Features,
    /// Dwelling mix, empty for single-dwelling properties.
    pub units: UnitBreakdown,
    pub description: Option<String>,
    /// Photo URLs in page order, deduplicated.
    pub photos: Vec<String>,
    /// When the extraction ran.
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_size_half_room_arithmetic() {
        let four_and_a_half = UnitSize::new(4, true);
        assert_eq!(four_and_a_half.rooms(), 4);
        assert!(four_and_a_half.has_half());
        assert_eq!(four_and_a_half.as_f64(), 4.5);
        assert_eq!(four_and_a_half.to_string(), "4½");

        let six = UnitSize::new(6, false);
        assert_eq!(six.as_f64(), 6.0);
        assert_eq!(six.to_string(), "6");
    }

    #[test]
    fn unit_sizes_order_by_half_rooms() {
        assert!(UnitSize::new(3, true) < UnitSize::new(4, false));
        assert!(UnitSize::new(4, false) < UnitSize::new(4, true));
    }

    #[test]
    fn breakdown_total_is_derived() {
        let mut breakdown = UnitBreakdown::default();
        breakdown.add(UnitSize::new(4, true), 1);
        breakdown.add(UnitSize::new(5, true), 2);
        breakdown.add(UnitSize::new(4, true), 1);
        assert_eq!(breakdown.count(UnitSize::new(4, true)), 2);
        assert_eq!(breakdown.total_units(), 4);
    }

    #[test]
    fn breakdown_counts_saturate() {
        let mut breakdown = UnitBreakdown::default();
        breakdown.add(UnitSize::new(4, true), u32::MAX);
        breakdown.add(UnitSize::new(4, true), 5);
        assert_eq!(breakdown.count(UnitSize::new(4, true)), u32::MAX);

        breakdown.add(UnitSize::new(3, false), 1);
        assert_eq!(breakdown.total_units(), u32::MAX);
    }

    #[test]
    fn breakdown_serializes_counts_and_total() {
        let mut breakdown = UnitBreakdown::default();
        breakdown.add(UnitSize::new(3, true), 1);
        breakdown.add(UnitSize::new(5, true), 2);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"counts":{"3.5":1,"5.5":2},"totalUnits":3}"#);
    }

    #[test]
    fn breakdown_deserialization_ignores_stored_total() {
        let breakdown: UnitBreakdown =
            serde_json::from_str(r#"{"counts":{"3.5":1,"5.5":2},"totalUnits":99}"#).unwrap();
        assert_eq!(breakdown.total_units(), 3);
    }

    #[test]
    fn whole_unit_sizes_round_trip() {
        let breakdown: UnitBreakdown = serde_json::from_str(r#"{"counts":{"4":2}}"#).unwrap();
        assert_eq!(breakdown.count(UnitSize::new(4, false)), 2);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"counts":{"4":2},"totalUnits":2}"#);
    }
}
