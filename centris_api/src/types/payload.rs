//! Wire types for the query endpoint payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field identifier for a broad administrative region.
pub const FIELD_GEOGRAPHIC_AREA: &str = "GeographicArea";
/// Field identifier for a city district.
pub const FIELD_CITY_DISTRICT: &str = "CityDistrict";
/// Field identifier for a property category.
pub const FIELD_PROPERTY_TYPE: &str = "PropertyType";
/// Field identifier for a sale-price bound. Sent once for the minimum and
/// once for the maximum.
pub const FIELD_SALE_PRICE: &str = "SalePrice";

/// One criterion in the query payload.
///
/// The backend models multi-valued criteria as repeated entries with the
/// same `fieldId` rather than as nested arrays, so a search over three
/// regions serializes as three entries.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    /// Backend field identifier, e.g. "GeographicArea".
    pub field_id: String,
    /// Field value. A string for region codes and categories, an integer
    /// for district ids and price bounds.
    pub value: Value,
}

/// Flat payload submitted to the query endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub field_values: Vec<FieldValue>,
}
