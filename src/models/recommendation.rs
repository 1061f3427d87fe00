use serde::Serialize;
use std::collections::HashSet;

use super::{GenreId, MovieId, PersonId, RecommendedMovie};

/// Preference summary derived from a user's rating history
///
/// Rebuilt on every recommendation request and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteProfile {
    /// Every movie the user rated at or above the relevance threshold
    pub watched_movie_ids: HashSet<MovieId>,
    /// Most frequent genres among watched movies (at most 5)
    pub preferred_genre_ids: Vec<GenreId>,
    /// Most frequent actors and directors among watched movies (at most 10)
    pub preferred_person_ids: Vec<PersonId>,
    /// Movie of the most recent rating
    pub latest_movie_id: Option<MovieId>,
}

impl TasteProfile {
    pub fn is_empty(&self) -> bool {
        self.watched_movie_ids.is_empty()
    }
}

/// Blending weights for the four score components. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationWeights {
    pub genre: f64,
    pub people: f64,
    pub rating: f64,
    pub popularity: f64,
}

impl RecommendationWeights {
    pub fn total(&self) -> f64 {
        self.genre + self.people + self.rating + self.popularity
    }
}

/// A movie paired with its ranking score
///
/// Scores are internal to ranking and never leave the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub movie: RecommendedMovie,
    pub score: f64,
}

impl ScoredMovie {
    pub fn new(movie: RecommendedMovie, score: f64) -> Self {
        Self { movie, score }
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie.movie_id
    }
}

/// Response body for the recommendations endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: i64,
    pub recommendations: Vec<RecommendedMovie>,
}
