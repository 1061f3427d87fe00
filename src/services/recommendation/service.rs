use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::instrument;

use crate::{
    db::{CatalogStore, RatingStore},
    models::{
        CandidateMovie, MovieId, RecommendationWeights, RecommendedMovie, ScoredMovie,
        TasteProfile,
    },
    services::similar::SimilarMoviesSource,
};

use super::{
    external::external_recommendations,
    merger::Merger,
    profile::build_taste_profile,
    scorer::score_candidates,
    weights::{generate_weights, RngPolicy},
    INTERNAL_PICKS, MIN_CANDIDATE_RATING, POPULAR_MIN_RATING, RESULT_SIZE,
};

const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Personalized movie recommendations
///
/// Each call builds a taste profile from the user's ratings, scores unwatched
/// catalog movies with freshly randomized weights, mixes in movies similar to
/// the latest rated one, and pads with highly rated movies. Nothing is kept
/// between calls.
///
/// The service never fails: query and network errors are logged and replaced
/// with empty results, so the worst case is an empty list.
pub struct RecommendationService {
    ratings: Arc<dyn RatingStore>,
    catalog: Arc<dyn CatalogStore>,
    similar: Arc<dyn SimilarMoviesSource>,
    rng_policy: RngPolicy,
    external_timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        catalog: Arc<dyn CatalogStore>,
        similar: Arc<dyn SimilarMoviesSource>,
    ) -> Self {
        Self {
            ratings,
            catalog,
            similar,
            rng_policy: RngPolicy::default(),
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }

    pub fn with_rng_policy(mut self, rng_policy: RngPolicy) -> Self {
        self.rng_policy = rng_policy;
        self
    }

    pub fn with_external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Recommends up to five movies the user has not rated yet
    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: i64, min_rating: f64) -> Vec<RecommendedMovie> {
        let start = Instant::now();

        let profile =
            build_taste_profile(self.ratings.as_ref(), self.catalog.as_ref(), user_id, min_rating)
                .await;

        if profile.is_empty() {
            let movies: Vec<RecommendedMovie> = self
                .popular_movies(&[], RESULT_SIZE)
                .await
                .into_iter()
                .map(RecommendedMovie::from)
                .collect();

            tracing::info!(
                user_id = user_id,
                results = movies.len(),
                processing_time_ms = start.elapsed().as_millis() as u64,
                "No rating history, served popular movies"
            );
            return movies;
        }

        let mut rng = self.rng_policy.rng();
        let weights = generate_weights(&mut rng);

        tracing::debug!(
            genre = weights.genre,
            people = weights.people,
            rating = weights.rating,
            popularity = weights.popularity,
            "Blending weights drawn"
        );

        let (internal, external) = tokio::join!(
            self.internal_recommendations(&profile, &weights),
            external_recommendations(
                self.similar.as_ref(),
                profile.latest_movie_id,
                self.external_timeout,
                &mut rng,
            ),
        );
        let internal_count = internal.len();
        let external_count = external.len();

        let mut merger = Merger::new(&profile.watched_movie_ids, RESULT_SIZE);
        merger.extend(internal);
        merger.extend(external);

        let mut fallback_count = 0;
        if merger.remaining() > 0 {
            let fallback = self
                .popular_movies(&merger.seen_ids(), merger.remaining())
                .await;
            fallback_count = merger.backfill(fallback.into_iter().map(RecommendedMovie::from));
        }

        let movies = merger.finish();

        tracing::info!(
            user_id = user_id,
            internal = internal_count,
            external = external_count,
            fallback = fallback_count,
            results = movies.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Recommendations computed"
        );

        movies
    }

    /// Top-scored unwatched candidates from the local catalog
    async fn internal_recommendations(
        &self,
        profile: &TasteProfile,
        weights: &RecommendationWeights,
    ) -> Vec<ScoredMovie> {
        let mut watched: Vec<MovieId> = profile.watched_movie_ids.iter().copied().collect();
        watched.sort_unstable();

        let candidates = match self.catalog.candidates(MIN_CANDIDATE_RATING, &watched).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stage = "candidates",
                    "Candidate pool query failed, continuing without internal picks"
                );
                return Vec::new();
            }
        };

        if candidates.is_empty() {
            return Vec::new();
        }

        let movie_ids: Vec<MovieId> = candidates.iter().map(|c| c.movie_id).collect();
        let comment_counts = match self.catalog.public_comment_counts(&movie_ids).await {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    stage = "popularity",
                    "Comment count query failed, scoring without popularity"
                );
                HashMap::new()
            }
        };

        let mut scored = score_candidates(&candidates, profile, weights, &comment_counts);

        tracing::debug!(
            candidates = candidates.len(),
            scored = scored.len(),
            "Candidate pool scored"
        );

        scored.truncate(INTERNAL_PICKS);
        scored
    }

    async fn popular_movies(&self, exclude: &[MovieId], limit: usize) -> Vec<CandidateMovie> {
        match self.catalog.popular(POPULAR_MIN_RATING, exclude, limit).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stage = "fallback",
                    "Popular movie query failed, continuing without fallback"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockCatalogStore, MockRatingStore};
    use crate::error::AppError;
    use crate::models::RatingRecord;
    use crate::services::similar::MockSimilarMoviesSource;
    use chrono::Utc;

    fn popular(ids: &[MovieId]) -> Vec<CandidateMovie> {
        ids.iter()
            .map(|&movie_id| CandidateMovie {
                movie_id,
                title: format!("Classic {}", movie_id),
                poster_url: None,
                average_rating: 9.0,
                genre_ids: vec![],
                person_ids: vec![],
            })
            .collect()
    }

    fn service(
        ratings: MockRatingStore,
        catalog: MockCatalogStore,
        similar: MockSimilarMoviesSource,
    ) -> RecommendationService {
        RecommendationService::new(Arc::new(ratings), Arc::new(catalog), Arc::new(similar))
            .with_rng_policy(RngPolicy::Seeded(7))
    }

    #[tokio::test]
    async fn test_empty_history_serves_popular_only() {
        let mut ratings = MockRatingStore::new();
        ratings.expect_ratings().returning(|_, _| Ok(vec![]));

        let mut catalog = MockCatalogStore::new();
        catalog.expect_candidates().never();
        catalog
            .expect_popular()
            .withf(|min_rating, exclude, limit| {
                *min_rating == POPULAR_MIN_RATING && exclude.is_empty() && *limit == RESULT_SIZE
            })
            .returning(|_, _, _| Ok(popular(&[1, 2, 3])));

        let mut similar = MockSimilarMoviesSource::new();
        similar.expect_similar_movies().never();

        let movies = service(ratings, catalog, similar).recommend(9, 1.0).await;
        let ids: Vec<MovieId> = movies.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_every_dependency_failing_returns_empty() {
        let mut ratings = MockRatingStore::new();
        ratings.expect_ratings().returning(|_, _| {
            Ok(vec![RatingRecord {
                movie_id: 10,
                rating: 9.0,
                created_at: Utc::now(),
            }])
        });

        let mut catalog = MockCatalogStore::new();
        catalog.expect_genres_for_movies().returning(|_| Ok(vec![]));
        catalog.expect_cast_for_movies().returning(|_, _| Ok(vec![]));
        catalog
            .expect_candidates()
            .returning(|_, _| Err(AppError::Internal("db down".to_string())));
        catalog
            .expect_popular()
            .returning(|_, _, _| Err(AppError::Internal("db down".to_string())));

        let mut similar = MockSimilarMoviesSource::new();
        similar
            .expect_similar_movies()
            .returning(|_, _| Err(AppError::ExternalApi("tmdb down".to_string())));
        similar.expect_name().return_const("mock");

        let movies = service(ratings, catalog, similar).recommend(9, 1.0).await;
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_count_failure_still_scores_candidates() {
        let mut ratings = MockRatingStore::new();
        ratings.expect_ratings().returning(|_, _| {
            Ok(vec![RatingRecord {
                movie_id: 10,
                rating: 9.0,
                created_at: Utc::now(),
            }])
        });

        let mut catalog = MockCatalogStore::new();
        catalog.expect_genres_for_movies().returning(|_| Ok(vec![(28, 10)]));
        catalog.expect_cast_for_movies().returning(|_, _| Ok(vec![]));
        catalog.expect_candidates().returning(|_, exclude| {
            assert_eq!(exclude, &[10]);
            Ok(popular(&[20, 21]))
        });
        catalog
            .expect_public_comment_counts()
            .returning(|_| Err(AppError::Internal("timeout".to_string())));
        catalog.expect_popular().returning(|_, _, _| Ok(vec![]));

        let mut similar = MockSimilarMoviesSource::new();
        similar.expect_similar_movies().returning(|_, _| Ok(vec![]));

        let movies = service(ratings, catalog, similar).recommend(9, 1.0).await;
        let ids: Vec<MovieId> = movies.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![20, 21]);
    }
}
