use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Duration;

use crate::{
    models::{MovieId, RecommendedMovie, ScoredMovie},
    services::similar::SimilarMoviesSource,
};

/// How many externally sourced movies join a recommendation
pub const EXTERNAL_PICKS: usize = 2;
/// Minimum result count before picks are sampled instead of taken in order
pub const SAMPLE_THRESHOLD: usize = 4;
/// Picks are sampled from this many leading results
pub const SAMPLE_WINDOW: usize = 8;
/// Fixed ranking score for external picks; they are never re-scored
pub const EXTERNAL_SCORE: f64 = 0.5;

/// Fetches movies similar to the user's latest rated movie and picks a few
///
/// Fails open: no latest movie, a source error, or a timeout all yield an
/// empty list.
pub async fn external_recommendations<R: Rng + ?Sized>(
    source: &dyn SimilarMoviesSource,
    latest_movie_id: Option<MovieId>,
    timeout: Duration,
    rng: &mut R,
) -> Vec<ScoredMovie> {
    let Some(movie_id) = latest_movie_id else {
        return Vec::new();
    };

    let similar = match tokio::time::timeout(timeout, source.similar_movies(movie_id, 1)).await {
        Ok(Ok(movies)) => movies,
        Ok(Err(e)) => {
            tracing::warn!(
                error = %e,
                movie_id = movie_id,
                source = source.name(),
                stage = "external",
                "Similar-movie lookup failed, continuing without external picks"
            );
            return Vec::new();
        }
        Err(_) => {
            tracing::warn!(
                movie_id = movie_id,
                source = source.name(),
                timeout_ms = timeout.as_millis() as u64,
                stage = "external",
                "Similar-movie lookup timed out, continuing without external picks"
            );
            return Vec::new();
        }
    };

    pick_similar(similar, rng)
        .into_iter()
        .map(|movie| ScoredMovie::new(movie, EXTERNAL_SCORE))
        .collect()
}

/// Samples picks from the leading window when there are enough results,
/// otherwise takes them from the front in order.
pub fn pick_similar<R: Rng + ?Sized>(
    movies: Vec<RecommendedMovie>,
    rng: &mut R,
) -> Vec<RecommendedMovie> {
    if movies.len() >= SAMPLE_THRESHOLD {
        let window = &movies[..movies.len().min(SAMPLE_WINDOW)];
        window.choose_multiple(rng, EXTERNAL_PICKS).cloned().collect()
    } else {
        movies.into_iter().take(EXTERNAL_PICKS).collect()
    }
}
