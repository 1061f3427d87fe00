pub mod postgres;
pub mod redis;
pub mod store;

pub use postgres::{create_pool, PgStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use store::{CatalogStore, RatingStore};

#[cfg(test)]
pub use store::{MockCatalogStore, MockRatingStore};
