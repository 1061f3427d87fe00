/// Sources of "movies similar to X" used to diversify recommendations
///
/// The engine only needs one operation from an external catalog: given a
/// movie, list movies similar to it. Keeping it behind a trait lets the
/// recommendation service run against TMDB in production and against
/// fixtures in tests.
use crate::{
    error::AppResult,
    models::{MovieId, RecommendedMovie},
};

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbConfig};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarMoviesSource: Send + Sync {
    /// Fetch one page of movies similar to `movie_id`, in source order
    async fn similar_movies(&self, movie_id: MovieId, page: u32) -> AppResult<Vec<RecommendedMovie>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}
