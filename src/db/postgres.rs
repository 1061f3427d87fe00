use sqlx::{postgres::PgPoolOptions, PgPool};
use std::collections::HashMap;

use crate::{
    db::{CatalogStore, RatingStore},
    error::AppResult,
    models::{CandidateMovie, CastRole, GenreId, MovieId, PersonId, RatingRecord},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Scoring candidates with their genres and credited people.
/// `$1` is the role filter for credited people.
const CANDIDATE_SELECT: &str = r#"
    SELECT
        m.movie_id::int8 AS movie_id,
        m.title,
        m.poster_url,
        COALESCE(m.average_rating, 0)::float8 AS average_rating,
        ARRAY(
            SELECT g.genre_id FROM movie_genres g
            WHERE g.movie_id = m.movie_id
            ORDER BY g.genre_id
        ) AS genre_ids,
        ARRAY(
            SELECT DISTINCT c.actor_id::int8 FROM movie_cast c
            WHERE c.movie_id = m.movie_id AND c.role::text = ANY($1)
        ) AS person_ids
    FROM movies m
    WHERE COALESCE(m.average_rating, 0)::float8 >= $2
      AND NOT (m.movie_id = ANY($3))
"#;

/// Postgres-backed rating and catalog queries
///
/// Every query borrows a pooled connection for its own duration, so no
/// connection outlives the call that needed it.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn taste_roles() -> Vec<&'static str> {
        CastRole::TASTE_ROLES.iter().map(CastRole::as_db_str).collect()
    }
}

#[async_trait::async_trait]
impl RatingStore for PgStore {
    async fn ratings(&self, user_id: i64, min_rating: f64) -> AppResult<Vec<RatingRecord>> {
        let rows = sqlx::query_as::<_, RatingRecord>(
            r#"
            SELECT
                movie_id::int8 AS movie_id,
                rating::float8 AS rating,
                created_at AT TIME ZONE 'UTC' AS created_at
            FROM comments
            WHERE user_id = $1
              AND rating IS NOT NULL
              AND rating::float8 >= $2
              AND is_public = true
            ORDER BY created_at DESC, comment_id DESC
            "#,
        )
        .bind(user_id)
        .bind(min_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn genres_for_movies(&self, movie_ids: &[MovieId]) -> AppResult<Vec<(GenreId, MovieId)>> {
        let rows = sqlx::query_as::<_, (GenreId, MovieId)>(
            r#"
            SELECT genre_id, movie_id::int8
            FROM movie_genres
            WHERE movie_id = ANY($1)
            "#,
        )
        .bind(movie_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn cast_for_movies(
        &self,
        movie_ids: &[MovieId],
        roles: &[CastRole],
    ) -> AppResult<Vec<(PersonId, MovieId)>> {
        let roles: Vec<&str> = roles.iter().map(CastRole::as_db_str).collect();

        let rows = sqlx::query_as::<_, (PersonId, MovieId)>(
            r#"
            SELECT actor_id::int8, movie_id::int8
            FROM movie_cast
            WHERE movie_id = ANY($1) AND role::text = ANY($2)
            "#,
        )
        .bind(movie_ids)
        .bind(&roles)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn candidates(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
    ) -> AppResult<Vec<CandidateMovie>> {
        let sql = format!("{} ORDER BY m.movie_id", CANDIDATE_SELECT);

        let movies = sqlx::query_as::<_, CandidateMovie>(&sql)
            .bind(Self::taste_roles())
            .bind(min_rating)
            .bind(exclude)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = movies.len(), "Candidate pool loaded");

        Ok(movies)
    }

    async fn popular(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
        limit: usize,
    ) -> AppResult<Vec<CandidateMovie>> {
        // Fallback rows are never scored, so genres and people are left empty
        let movies = sqlx::query_as::<_, CandidateMovie>(
            r#"
            SELECT
                m.movie_id::int8 AS movie_id,
                m.title,
                m.poster_url,
                COALESCE(m.average_rating, 0)::float8 AS average_rating,
                '{}'::int4[] AS genre_ids,
                '{}'::int8[] AS person_ids
            FROM movies m
            WHERE COALESCE(m.average_rating, 0)::float8 >= $1
              AND NOT (m.movie_id = ANY($2))
            ORDER BY average_rating DESC, m.movie_id ASC
            LIMIT $3
            "#,
        )
        .bind(min_rating)
        .bind(exclude)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn public_comment_count(&self, movie_id: MovieId) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE movie_id = $1 AND is_public = true
            "#,
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn public_comment_counts(&self, movie_ids: &[MovieId]) -> AppResult<HashMap<MovieId, i64>> {
        let rows = sqlx::query_as::<_, (MovieId, i64)>(
            r#"
            SELECT movie_id::int8, COUNT(*)
            FROM comments
            WHERE movie_id = ANY($1) AND is_public = true
            GROUP BY movie_id
            "#,
        )
        .bind(movie_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut counts: HashMap<MovieId, i64> = movie_ids.iter().map(|&id| (id, 0)).collect();
        counts.extend(rows);

        Ok(counts)
    }
}
