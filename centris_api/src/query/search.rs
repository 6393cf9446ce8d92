use serde_json::Value;

use crate::types::{
    FieldValue, PropertyCategory, QueryPayload, SearchArea, FIELD_PROPERTY_TYPE, FIELD_SALE_PRICE,
};
use crate::Error;

/// Sale-price filter in whole dollars. Either bound may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// An immutable property search.
///
/// Construction goes through [`SearchQueryBuilder`], which enforces the
/// build-time invariants (at least one area, at least one category, and a
/// coherent price range). Once built, a query cannot be mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    areas: Vec<SearchArea>,
    categories: Vec<PropertyCategory>,
    price: Option<PriceRange>,
}

impl SearchQuery {
    /// Starts building a query.
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    /// Areas the search is scoped to.
    pub fn areas(&self) -> &[SearchArea] {
        &self.areas
    }

    /// Categories the search is restricted to.
    pub fn categories(&self) -> &[PropertyCategory] {
        &self.categories
    }

    /// Price filter, if any.
    pub fn price(&self) -> Option<PriceRange> {
        self.price
    }

    /// Renders the query as the flat payload the backend expects.
    ///
    /// Multi-valued criteria become repeated `fieldId` entries. Order is
    /// deterministic: areas, then categories, then price bounds.
    pub fn to_payload(&self) -> QueryPayload {
        let mut field_values = Vec::new();
        for area in self.areas.iter() {
            field_values.push(area.to_field_value());
        }
        for category in self.categories.iter() {
            field_values.push(FieldValue {
                field_id: FIELD_PROPERTY_TYPE.to_string(),
                value: Value::String(category.backend_value().to_string()),
            });
        }
        if let Some(price) = &self.price {
            if let Some(min) = price.min {
                field_values.push(FieldValue {
                    field_id: FIELD_SALE_PRICE.to_string(),
                    value: Value::from(min),
                });
            }
            if let Some(max) = price.max {
                field_values.push(FieldValue {
                    field_id: FIELD_SALE_PRICE.to_string(),
                    value: Value::from(max),
                });
            }
        }
        QueryPayload { field_values }
    }
}

/// Builder for [`SearchQuery`].
#[derive(Default)]
pub struct SearchQueryBuilder {
    areas: Vec<SearchArea>,
    categories: Vec<PropertyCategory>,
    min_price: Option<i64>,
    max_price: Option<i64>,
}

impl SearchQueryBuilder {
    pub fn with_area(mut self, area: SearchArea) -> Self {
        self.areas.push(area);
        self
    }
    pub fn with_areas(mut self, areas: &[SearchArea]) -> Self {
        self.areas.extend_from_slice(areas);
        self
    }

    pub fn with_category(mut self, category: PropertyCategory) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }
    pub fn with_categories(mut self, categories: &[PropertyCategory]) -> Self {
        for category in categories {
            self = self.with_category(*category);
        }
        self
    }

    pub fn with_min_price(mut self, min: i64) -> Self {
        self.min_price = Some(min);
        self
    }
    pub fn with_max_price(mut self, max: i64) -> Self {
        self.max_price = Some(max);
        self
    }
    pub fn with_price_range(mut self, min: i64, max: i64) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    /// Validates the accumulated criteria and produces the query.
    pub fn build(self) -> Result<SearchQuery, Error> {
        if self.areas.is_empty() {
            return Err(Error::InvalidQuery {
                reason: "at least one search area is required".to_string(),
            });
        }
        if self.categories.is_empty() {
            return Err(Error::InvalidQuery {
                reason: "at least one property category is required".to_string(),
            });
        }
        if let Some(min) = self.min_price {
            if min < 0 {
                return Err(Error::InvalidQuery {
                    reason: "minimum price must be non-negative".to_string(),
                });
            }
        }
        if let Some(max) = self.max_price {
            if max < 0 {
                return Err(Error::InvalidQuery {
                    reason: "maximum price must be non-negative".to_string(),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(Error::InvalidQuery {
                    reason: format!("minimum price {} exceeds maximum price {}", min, max),
                });
            }
        }

        let price = if self.min_price.is_some() || self.max_price.is_some() {
            Some(PriceRange {
                min: self.min_price,
                max: self.max_price,
            })
        } else {
            None
        };

        Ok(SearchQuery {
            areas: self.areas,
            categories: self.categories,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{PropertyCategory, SearchArea};
    use crate::Error;

    use super::SearchQuery;

    fn montreal_plex() -> SearchQuery {
        SearchQuery::builder()
            .with_area(SearchArea::region("RARA16", "Montérégie"))
            .with_area(SearchArea::district(449, "Rosemont/La Petite-Patrie"))
            .with_category(PropertyCategory::Plex)
            .with_price_range(200_000, 450_000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let payload = montreal_plex().to_payload();
        let json = serde_json::to_string(&payload).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"fieldValues":[{"fieldId":"GeographicArea","value":"RARA16"},{"fieldId":"CityDistrict","value":449},{"fieldId":"PropertyType","value":"Plex"},{"fieldId":"SalePrice","value":200000},{"fieldId":"SalePrice","value":450000}]}"#
        );
    }

    #[test]
    fn test_open_price_bounds() {
        let query = SearchQuery::builder()
            .with_area(SearchArea::region("RARA16", "Montérégie"))
            .with_category(PropertyCategory::Condominium)
            .with_max_price(300_000)
            .build()
            .unwrap();
        let payload = query.to_payload();
        let json = serde_json::to_string(&payload).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"fieldValues":[{"fieldId":"GeographicArea","value":"RARA16"},{"fieldId":"PropertyType","value":"SellCondo"},{"fieldId":"SalePrice","value":300000}]}"#
        );
    }

    #[test]
    fn test_build_requires_area() {
        let err = SearchQuery::builder()
            .with_category(PropertyCategory::Plex)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_build_requires_category() {
        let err = SearchQuery::builder()
            .with_area(SearchArea::district(449, "Rosemont/La Petite-Patrie"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_build_rejects_inverted_price_range() {
        let err = SearchQuery::builder()
            .with_area(SearchArea::region("RARA16", "Montérégie"))
            .with_category(PropertyCategory::Plex)
            .with_price_range(500_000, 100_000)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_duplicate_categories_collapse() {
        let query = SearchQuery::builder()
            .with_area(SearchArea::region("RARA16", "Montérégie"))
            .with_categories(&[
                PropertyCategory::Plex,
                PropertyCategory::Plex,
                PropertyCategory::Condominium,
            ])
            .build()
            .unwrap();
        assert_eq!(query.categories().len(), 2);
    }
}
