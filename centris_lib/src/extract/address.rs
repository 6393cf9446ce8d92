//! Address-line parsing.
//!
//! Detail pages print one address line, comma-separated:
//! "5655 Rue de Bordeaux, Montréal (Rosemont/La Petite-Patrie), H2G 2R4".
//! The city segment carries the borough in parentheses. Any part can be
//! missing.

use std::sync::OnceLock;

use regex::Regex;

use crate::listing::Address;

use super::text;

fn postal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z]\d[A-Za-z])\s?(\d[A-Za-z]\d)\b").unwrap())
}

/// Splits a printed address line into its parts.
pub fn parse_address_line(raw: &str) -> Address {
    let cleaned = text::clean_text(raw);
    if cleaned.is_empty() {
        return Address::default();
    }

    let postal_code = postal_re()
        .captures(&cleaned)
        .map(|cap| format!("{} {}", cap[1].to_uppercase(), cap[2].to_uppercase()));

    let segments: Vec<String> = cleaned
        .split(',')
        .map(text::clean_text)
        .filter(|segment| !segment.is_empty() && !postal_re().is_match(segment))
        .collect();

    let city_idx = segments.iter().position(|segment| segment.contains('('));
    let (street, city, district) = match city_idx {
        Some(idx) => {
            let street = (idx > 0).then(|| segments[..idx].join(", "));
            let (city, district) = split_city_line(&segments[idx]);
            (street, city, district)
        }
        None => match segments.len() {
            0 => (None, None, None),
            1 => (Some(segments[0].clone()), None, None),
            _ => (Some(segments[0].clone()), Some(segments[1].clone()), None),
        },
    };

    Address {
        street,
        city,
        district,
        postal_code,
    }
}

/// Splits "Montréal (Rosemont/La Petite-Patrie)" into city and district.
/// Lines without parentheses are all city.
pub(crate) fn split_city_line(raw: &str) -> (Option<String>, Option<String>) {
    let cleaned = text::clean_text(raw);
    if cleaned.is_empty() {
        return (None, None);
    }
    match cleaned.split_once('(') {
        Some((city, rest)) => {
            let city = text::clean_text(city);
            let district = text::clean_text(rest.trim_end_matches(')'));
            (non_empty(city), non_empty(district))
        }
        None => (Some(cleaned), None),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
