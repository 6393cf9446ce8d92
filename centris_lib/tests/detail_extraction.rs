use centris_lib::types::PropertyCategory;
use centris_lib::{DetailExtractor, UnitSize};

const DETAIL_PLEX: &str = include_str!("fixtures/detail_plex.html");
const DETAIL_NOT_FOUND: &str = include_str!("fixtures/detail_not_found.html");
const SOURCE_URL: &str =
    "https://www.centris.ca/fr/triplex~a-vendre~montreal-rosemont-la-petite-patrie/28191476";

#[test]
fn plex_page_yields_a_complete_record() {
    let record = DetailExtractor::new()
        .extract(DETAIL_PLEX, SOURCE_URL)
        .expect("fixture should yield a record");

    assert_eq!(record.id, "28191476");
    assert_eq!(record.category, Some(PropertyCategory::Plex));
    assert_eq!(record.status.as_deref(), Some("For sale"));
    assert_eq!(record.source_url, SOURCE_URL);

    assert_eq!(record.address.street.as_deref(), Some("5655, Rue de Bordeaux"));
    assert_eq!(record.address.city.as_deref(), Some("Montréal"));
    assert_eq!(
        record.address.district.as_deref(),
        Some("Rosemont/La Petite-Patrie")
    );
    assert_eq!(record.address.postal_code.as_deref(), Some("H2G 2R4"));

    let coordinates = record.coordinates.expect("fixture has coordinates");
    assert_eq!(coordinates.latitude, 45.5418);
    assert_eq!(coordinates.longitude, -73.5796);

    assert_eq!(record.financials.price, Some(549_000));
    assert_eq!(record.financials.municipal_tax, Some(4_326));
    assert_eq!(record.financials.school_tax, Some(512));
    assert_eq!(record.financials.assessment, Some(487_000));
    assert_eq!(record.financials.gross_revenue, Some(40_920));

    assert_eq!(record.features.rooms, Some(5));
    assert_eq!(record.features.bedrooms, Some(3));
    assert_eq!(record.features.bathrooms, Some(1));
    assert_eq!(record.features.year_built, Some(1948));
    assert_eq!(record.features.lot_area, Some(3_251));
    assert_eq!(record.features.parking_spaces, Some(3));
    assert_eq!(record.features.walk_score, Some(84));

    assert_eq!(record.units.count(UnitSize::new(3, true)), 1);
    assert_eq!(record.units.count(UnitSize::new(5, true)), 2);
    assert_eq!(record.units.total_units(), 3);

    assert!(record
        .description
        .as_deref()
        .unwrap()
        .contains("parc Molson"));
    // The duplicate photo URL collapses.
    assert_eq!(record.photos.len(), 2);
    assert!(record.photos[0].ends_with("/01.jpg"));
}

#[test]
fn removed_listing_page_yields_none() {
    assert!(DetailExtractor::new()
        .extract(DETAIL_NOT_FOUND, "https://www.centris.ca/fr/triplex/99999999")
        .is_none());
}

#[test]
fn record_serializes_with_camel_case_keys() {
    let record = DetailExtractor::new()
        .extract(DETAIL_PLEX, SOURCE_URL)
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["id"], "28191476");
    assert_eq!(json["financials"]["municipalTax"], 4_326);
    assert_eq!(json["financials"]["grossRevenue"], 40_920);
    assert_eq!(json["features"]["yearBuilt"], 1_948);
    assert_eq!(json["features"]["walkScore"], 84);
    assert_eq!(json["units"]["totalUnits"], 3);
    assert_eq!(json["units"]["counts"]["3.5"], 1);
    assert_eq!(json["units"]["counts"]["5.5"], 2);
    assert_eq!(json["address"]["postalCode"], "H2G 2R4");
}
