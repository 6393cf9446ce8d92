//! Parsers for unit mixes and other numeric characteristic values.
//!
//! Revenue properties advertise their dwelling mix as a comma-separated
//! list of "count x size" segments, e.g. "1 x 4 ½, 2 x 5 ½". The main
//! dwelling gets its own sentence, "5 pièces, 3 chambres, 1 salle de bain".

use std::sync::OnceLock;

use regex::Regex;

use crate::listing::{MainUnitDetail, UnitBreakdown, UnitSize};

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\s*[xX×]\s*(\d+)\s*(½)?$").unwrap())
}

fn rooms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:pi[èe]ces?|rooms?)").unwrap())
}

fn bedrooms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:chambres?|bedrooms?)").unwrap())
}

fn bathrooms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:salles?\s*de\s*bains?|bathrooms?)").unwrap())
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(1[6-9]\d{2}|20\d{2})\b").unwrap())
}

fn area_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([\d\s,.]+?)\s*(?:pc|pi2|pi²|sq\.?\s?ft|sqft|ft2|ft²|m2|m²|mc)").unwrap()
    })
}

fn parenthesized_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((\d+)\)").unwrap())
}

/// Parses a dwelling-mix string like "1 x 4 ½, 2 x 5 ½" into a breakdown.
///
/// Malformed segments are skipped, not fatal: "garage, 2 x 5 ½" still
/// yields the two 5½s. Counts for a size repeated across segments
/// accumulate. An unparseable or empty string yields an empty breakdown.
pub fn parse_unit_breakdown(raw: &str) -> UnitBreakdown {
    let mut breakdown = UnitBreakdown::default();
    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some(cap) = segment_re().captures(segment) else {
            tracing::debug!("Skipping malformed unit segment {:?}", segment);
            continue;
        };
        let (Ok(count), Ok(rooms)) = (cap[1].parse::<u32>(), cap[2].parse::<u16>()) else {
            tracing::debug!("Skipping out-of-range unit segment {:?}", segment);
            continue;
        };
        breakdown.add(UnitSize::new(rooms, cap.get(3).is_some()), count);
    }
    breakdown
}

/// Parses the main-dwelling sentence, tolerating French and English in any
/// order. Missing counts stay `None`.
pub fn parse_main_unit_detail(raw: &str) -> MainUnitDetail {
    MainUnitDetail {
        rooms: first_number(rooms_re(), raw),
        bedrooms: first_number(bedrooms_re(), raw),
        bathrooms: first_number(bathrooms_re(), raw),
    }
}

/// Extracts a plausible construction year (1600 through 2099).
pub fn parse_year(raw: &str) -> Option<i32> {
    year_re()
        .captures(raw)
        .and_then(|cap| cap[1].parse().ok())
}

/// Parses an area value, stripping thousands separators and the unit
/// suffix. Values without a recognized suffix are rejected.
pub fn parse_area(raw: &str) -> Option<u64> {
    let cap = area_re().captures(raw)?;
    let digits: String = cap[1].chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Sums parenthesized tallies like "Driveway (2), Garage (1)" into a total
/// space count. Returns `None` when no tally is present.
pub fn parse_parking_total(raw: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let mut found = false;
    for cap in parenthesized_re().captures_iter(raw) {
        if let Ok(n) = cap[1].parse::<u32>() {
            total = total.saturating_add(n);
            found = true;
        }
    }
    found.then_some(total)
}

/// Extracts a Walk Score, rejecting values over 100.
pub fn parse_walk_score(raw: &str) -> Option<u32> {
    let score = super::text::parse_count(raw)?;
    (score <= 100).then_some(score)
}

fn first_number(re: &Regex, raw: &str) -> Option<u32> {
    re.captures(raw).and_then(|cap| cap[1].parse().ok())
}
