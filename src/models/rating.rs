use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// A user's rating of a movie, read from the comment subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RatingRecord {
    pub movie_id: MovieId,
    /// Rating on the 0-10 scale
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Credit role of a person on a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastRole {
    /// Acting credit
    Cast,
    Director,
    /// Stored for completeness of the `movie_cast.role` column; never feeds
    /// the taste profile
    Crew,
}

impl CastRole {
    /// Roles that feed the taste profile's preferred people
    pub const TASTE_ROLES: [CastRole; 2] = [CastRole::Cast, CastRole::Director];

    /// Value stored in the `movie_cast.role` column
    pub fn as_db_str(&self) -> &'static str {
        match self {
            CastRole::Cast => "cast",
            CastRole::Director => "director",
            CastRole::Crew => "crew",
        }
    }
}
