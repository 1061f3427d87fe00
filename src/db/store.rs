//! Read contracts the recommendation engine consumes.
//!
//! Ratings belong to the comment subsystem and the catalog to the movie
//! subsystem; both are only ever read here.
use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{CandidateMovie, CastRole, GenreId, MovieId, PersonId, RatingRecord},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Ratings of `user_id` at or above `min_rating`, newest first
    async fn ratings(&self, user_id: i64, min_rating: f64) -> AppResult<Vec<RatingRecord>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// `(genre_id, movie_id)` pairs for the given movies
    async fn genres_for_movies(&self, movie_ids: &[MovieId]) -> AppResult<Vec<(GenreId, MovieId)>>;

    /// `(person_id, movie_id)` pairs for credits with one of `roles`
    async fn cast_for_movies(
        &self,
        movie_ids: &[MovieId],
        roles: &[CastRole],
    ) -> AppResult<Vec<(PersonId, MovieId)>>;

    /// Movies rated at least `min_rating` that are not in `exclude`, by movie id
    async fn candidates(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
    ) -> AppResult<Vec<CandidateMovie>>;

    /// Highest rated movies at least `min_rating`, not in `exclude`
    async fn popular(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
        limit: usize,
    ) -> AppResult<Vec<CandidateMovie>>;

    /// Number of public comments on a movie
    async fn public_comment_count(&self, movie_id: MovieId) -> AppResult<i64>;

    /// Public comment counts for several movies
    ///
    /// Default implementation queries each movie separately. A failed lookup
    /// counts as zero for that movie. Stores can override this with a
    /// single grouped query.
    async fn public_comment_counts(&self, movie_ids: &[MovieId]) -> AppResult<HashMap<MovieId, i64>> {
        let mut counts = HashMap::with_capacity(movie_ids.len());

        for &movie_id in movie_ids {
            let count = match self.public_comment_count(movie_id).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        movie_id = movie_id,
                        stage = "popularity",
                        "Comment count lookup failed, treating as zero"
                    );
                    0
                }
            };
            counts.insert(movie_id, count);
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct CountOnly;

    #[async_trait::async_trait]
    impl CatalogStore for CountOnly {
        async fn genres_for_movies(&self, _: &[MovieId]) -> AppResult<Vec<(GenreId, MovieId)>> {
            Ok(vec![])
        }

        async fn cast_for_movies(
            &self,
            _: &[MovieId],
            _: &[CastRole],
        ) -> AppResult<Vec<(PersonId, MovieId)>> {
            Ok(vec![])
        }

        async fn candidates(&self, _: f64, _: &[MovieId]) -> AppResult<Vec<CandidateMovie>> {
            Ok(vec![])
        }

        async fn popular(&self, _: f64, _: &[MovieId], _: usize) -> AppResult<Vec<CandidateMovie>> {
            Ok(vec![])
        }

        async fn public_comment_count(&self, movie_id: MovieId) -> AppResult<i64> {
            if movie_id == 13 {
                Err(AppError::Internal("row decode failed".to_string()))
            } else {
                Ok(movie_id * 2)
            }
        }
    }

    #[tokio::test]
    async fn test_default_batch_counts_each_movie() {
        let counts = CountOnly.public_comment_counts(&[1, 2, 3]).await.unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&3], 6);
    }

    #[tokio::test]
    async fn test_default_batch_zeroes_failed_lookup() {
        let counts = CountOnly.public_comment_counts(&[13, 4]).await.unwrap();
        assert_eq!(counts[&13], 0);
        assert_eq!(counts[&4], 8);
    }
}
