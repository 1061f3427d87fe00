use serde::{Deserialize, Serialize};

pub type MovieId = i64;
pub type GenreId = i32;
pub type PersonId = i64;

/// A catalog movie eligible for recommendation scoring
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CandidateMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    /// Catalog rating on the 0-10 scale
    pub average_rating: f64,
    pub genre_ids: Vec<GenreId>,
    /// Actors and directors credited on the movie
    pub person_ids: Vec<PersonId>,
}

/// A recommended movie as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
}

impl From<&CandidateMovie> for RecommendedMovie {
    fn from(movie: &CandidateMovie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

impl From<CandidateMovie> for RecommendedMovie {
    fn from(movie: CandidateMovie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            poster_url: movie.poster_url,
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a TMDB list endpoint (e.g. /movie/{id}/similar)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Movie summary as listed by TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}
