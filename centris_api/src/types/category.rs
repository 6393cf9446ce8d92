//! Property categories understood by the query endpoint.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Property category filter.
///
/// The serialized form is the backend's own vocabulary, which is what goes
/// into the query payload verbatim.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyCategory {
    /// Detached or semi-detached single-family home.
    #[serde(rename = "SingleFamilyHome")]
    SingleFamilyHome,

    /// Divided or undivided co-ownership unit.
    #[serde(rename = "SellCondo")]
    Condominium,

    /// Revenue property with multiple dwellings (duplex through multiplex).
    #[serde(rename = "Plex")]
    Plex,

    /// Vacant lot.
    #[serde(rename = "Land")]
    Land,

    /// Farm or hobby farm.
    #[serde(rename = "Farm")]
    Farm,
}

impl PropertyCategory {
    /// The value sent in the query payload for this category.
    pub fn backend_value(&self) -> &'static str {
        match self {
            PropertyCategory::SingleFamilyHome => "SingleFamilyHome",
            PropertyCategory::Condominium => "SellCondo",
            PropertyCategory::Plex => "Plex",
            PropertyCategory::Land => "Land",
            PropertyCategory::Farm => "Farm",
        }
    }

    /// Maps a listing-page label (English or French) to a category.
    ///
    /// Labels come from thumbnail cards and page titles, e.g.
    /// "Triplex for sale" or "Maison à vendre", so matching is
    /// case-insensitive and tolerant of surrounding text.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded = label.to_lowercase();
        let has = |needle: &str| folded.contains(needle);

        if has("plex") || has("duplex") || has("triplex") || has("quadruplex") || has("quintuplex")
        {
            return Some(PropertyCategory::Plex);
        }
        if has("condo") || has("appartement") || has("apartment") || has("loft") {
            return Some(PropertyCategory::Condominium);
        }
        if has("farm") || has("ferme") || has("fermette") {
            return Some(PropertyCategory::Farm);
        }
        if has("land") || has("lot ") || has("terrain") {
            return Some(PropertyCategory::Land);
        }
        if has("house") || has("maison") || has("bungalow") || has("cottage") || has("chalet") {
            return Some(PropertyCategory::SingleFamilyHome);
        }
        None
    }
}

impl std::fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.backend_value())
    }
}

impl FromStr for PropertyCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SingleFamilyHome" => Ok(PropertyCategory::SingleFamilyHome),
            "SellCondo" => Ok(PropertyCategory::Condominium),
            "Plex" => Ok(PropertyCategory::Plex),
            "Land" => Ok(PropertyCategory::Land),
            "Farm" => Ok(PropertyCategory::Farm),
            _ => Err(()),
        }
    }
}
