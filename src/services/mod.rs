pub mod recommendation;
pub mod similar;

pub use recommendation::RecommendationService;
pub use similar::{SimilarMoviesSource, TmdbClient, TmdbConfig};
