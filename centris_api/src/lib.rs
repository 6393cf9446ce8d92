mod client;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::{Session, SessionConfig, DEFAULT_BASE_URL};
pub use self::errors::Error;
pub use self::query::{PriceRange, SearchQuery, SearchQueryBuilder};
