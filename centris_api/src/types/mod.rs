mod area;
pub use self::area::SearchArea;

mod category;
pub use self::category::PropertyCategory;

mod payload;
pub use self::payload::{
    FieldValue, QueryPayload, FIELD_CITY_DISTRICT, FIELD_GEOGRAPHIC_AREA, FIELD_PROPERTY_TYPE,
    FIELD_SALE_PRICE,
};
