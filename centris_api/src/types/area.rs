//! Geographic search areas accepted by the query endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::{FieldValue, FIELD_CITY_DISTRICT, FIELD_GEOGRAPHIC_AREA};

/// A geographic area a search can be scoped to.
///
/// Regions are broad administrative areas addressed by an opaque backend
/// code (e.g. "RARA16" for the Montérégie). Districts are finer-grained
/// city subdivisions addressed by a numeric identifier. The two kinds map
/// to different field identifiers in the query payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SearchArea {
    /// Broad administrative region, addressed by backend code.
    Region {
        /// Opaque backend code (e.g. "RARA16").
        code: String,
        /// Human-readable name, used for result validation.
        name: String,
    },
    /// City district, addressed by numeric identifier.
    District {
        /// Numeric district identifier.
        id: i64,
        /// Human-readable name, used for result validation.
        name: String,
    },
}

impl SearchArea {
    /// Creates a region area from its backend code and display name.
    pub fn region(code: &str, name: &str) -> Self {
        SearchArea::Region {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    /// Creates a district area from its numeric id and display name.
    pub fn district(id: i64, name: &str) -> Self {
        SearchArea::District {
            id,
            name: name.to_string(),
        }
    }

    /// Human-readable name of the area, as shown on listing pages.
    pub fn display_name(&self) -> &str {
        match self {
            SearchArea::Region { name, .. } => name,
            SearchArea::District { name, .. } => name,
        }
    }

    pub(crate) fn to_field_value(&self) -> FieldValue {
        match self {
            SearchArea::Region { code, .. } => FieldValue {
                field_id: FIELD_GEOGRAPHIC_AREA.to_string(),
                value: Value::String(code.clone()),
            },
            SearchArea::District { id, .. } => FieldValue {
                field_id: FIELD_CITY_DISTRICT.to_string(),
                value: Value::from(*id),
            },
        }
    }
}

impl std::fmt::Display for SearchArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
