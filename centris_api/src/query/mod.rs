mod search;
pub use self::search::{PriceRange, SearchQuery, SearchQueryBuilder};
