//! Recommendation engine: taste profile, weighted scoring, external picks,
//! and merging into a fixed-size result.
pub mod external;
pub mod merger;
pub mod profile;
pub mod scorer;
pub mod service;
pub mod weights;

pub use service::RecommendationService;
pub use weights::RngPolicy;

/// Ratings at or above this count as an explicit rating by default
pub const DEFAULT_MIN_RATING: f64 = 1.0;
/// Catalog quality bar for scored candidates
pub const MIN_CANDIDATE_RATING: f64 = 6.0;
/// Catalog quality bar for popularity fallback
pub const POPULAR_MIN_RATING: f64 = 8.0;
/// Maximum number of recommendations returned
pub const RESULT_SIZE: usize = 5;
/// How many internally scored movies join a recommendation
pub const INTERNAL_PICKS: usize = 3;
