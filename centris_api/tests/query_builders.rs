use centris_api::types::{PropertyCategory, SearchArea, FIELD_SALE_PRICE};
use centris_api::{Error, SearchQuery};

fn field_count(query: &SearchQuery, field_id: &str) -> usize {
    query
        .to_payload()
        .field_values
        .iter()
        .filter(|fv| fv.field_id == field_id)
        .count()
}

#[test]
fn multi_area_query_repeats_field_ids() {
    let query = SearchQuery::builder()
        .with_areas(&[
            SearchArea::region("RARA16", "Montérégie"),
            SearchArea::region("RARA13", "Laval"),
            SearchArea::district(449, "Rosemont/La Petite-Patrie"),
        ])
        .with_category(PropertyCategory::Plex)
        .build()
        .unwrap();

    assert_eq!(field_count(&query, "GeographicArea"), 2);
    assert_eq!(field_count(&query, "CityDistrict"), 1);
    assert_eq!(field_count(&query, "PropertyType"), 1);
}

#[test]
fn mixed_area_kinds_keep_their_values() {
    let query = SearchQuery::builder()
        .with_area(SearchArea::region("RARA16", "Montérégie"))
        .with_area(SearchArea::district(449, "Rosemont/La Petite-Patrie"))
        .with_category(PropertyCategory::Plex)
        .build()
        .unwrap();

    let payload = query.to_payload();
    assert_eq!(
        payload.field_values[0].value,
        serde_json::Value::String("RARA16".to_string())
    );
    assert_eq!(payload.field_values[1].value, serde_json::json!(449));
}

#[test]
fn price_bounds_share_one_field_id() {
    let query = SearchQuery::builder()
        .with_area(SearchArea::region("RARA16", "Montérégie"))
        .with_category(PropertyCategory::Condominium)
        .with_price_range(150_000, 350_000)
        .build()
        .unwrap();

    assert_eq!(field_count(&query, FIELD_SALE_PRICE), 2);
    let payload = query.to_payload();
    let bounds: Vec<i64> = payload
        .field_values
        .iter()
        .filter(|fv| fv.field_id == FIELD_SALE_PRICE)
        .filter_map(|fv| fv.value.as_i64())
        .collect();
    assert_eq!(bounds, vec![150_000, 350_000]);
}

#[test]
fn equal_price_bounds_are_valid() {
    let query = SearchQuery::builder()
        .with_area(SearchArea::region("RARA16", "Montérégie"))
        .with_category(PropertyCategory::Plex)
        .with_price_range(250_000, 250_000)
        .build()
        .unwrap();
    assert_eq!(field_count(&query, FIELD_SALE_PRICE), 2);
}

#[test]
fn negative_price_is_rejected() {
    let err = SearchQuery::builder()
        .with_area(SearchArea::region("RARA16", "Montérégie"))
        .with_category(PropertyCategory::Plex)
        .with_min_price(-1)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery { .. }));
}

#[test]
fn query_without_price_has_no_price_fields() {
    let query = SearchQuery::builder()
        .with_area(SearchArea::district(449, "Rosemont/La Petite-Patrie"))
        .with_category(PropertyCategory::Plex)
        .build()
        .unwrap();
    assert_eq!(field_count(&query, FIELD_SALE_PRICE), 0);
    assert!(query.price().is_none());
}
