#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use cinemate_api::{
    db::{CatalogStore, RatingStore},
    error::{AppError, AppResult},
    models::{CandidateMovie, CastRole, GenreId, MovieId, PersonId, RatingRecord, RecommendedMovie},
    services::{
        recommendation::RngPolicy, RecommendationService, SimilarMoviesSource,
    },
};

pub const ACTION: GenreId = 28;
pub const DRAMA: GenreId = 18;
pub const COMEDY: GenreId = 35;

/// In-memory stand-in for the rating and catalog tables
#[derive(Default, Clone)]
pub struct InMemoryStore {
    ratings: Vec<(i64, RatingRecord)>,
    movies: Vec<CandidateMovie>,
    credits: Vec<(MovieId, PersonId, CastRole)>,
    comment_counts: HashMap<MovieId, i64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(
        mut self,
        movie_id: MovieId,
        average_rating: f64,
        genre_ids: &[GenreId],
        person_ids: &[PersonId],
    ) -> Self {
        self.credits
            .extend(person_ids.iter().map(|&p| (movie_id, p, CastRole::Cast)));
        self.movies.push(CandidateMovie {
            movie_id,
            title: format!("Movie {}", movie_id),
            poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", movie_id)),
            average_rating,
            genre_ids: genre_ids.to_vec(),
            person_ids: person_ids.to_vec(),
        });
        self
    }

    /// `order` orders ratings in time: a larger value is more recent
    pub fn with_rating(mut self, user_id: i64, movie_id: MovieId, rating: f64, order: u32) -> Self {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::hours(order as i64);
        self.ratings.push((
            user_id,
            RatingRecord {
                movie_id,
                rating,
                created_at,
            },
        ));
        self
    }

    /// Crew credits are stored but never surface as a candidate's people
    pub fn with_crew(mut self, movie_id: MovieId, person_id: PersonId) -> Self {
        self.credits.push((movie_id, person_id, CastRole::Crew));
        self
    }

    pub fn with_comments(mut self, movie_id: MovieId, count: i64) -> Self {
        self.comment_counts.insert(movie_id, count);
        self
    }

    pub fn movie(&self, movie_id: MovieId) -> Option<&CandidateMovie> {
        self.movies.iter().find(|m| m.movie_id == movie_id)
    }

    pub fn watched_by(&self, user_id: i64, min_rating: f64) -> Vec<MovieId> {
        self.ratings
            .iter()
            .filter(|(uid, r)| *uid == user_id && r.rating >= min_rating)
            .map(|(_, r)| r.movie_id)
            .collect()
    }
}

#[async_trait::async_trait]
impl RatingStore for InMemoryStore {
    async fn ratings(&self, user_id: i64, min_rating: f64) -> AppResult<Vec<RatingRecord>> {
        let mut records: Vec<RatingRecord> = self
            .ratings
            .iter()
            .filter(|(uid, r)| *uid == user_id && r.rating >= min_rating)
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn genres_for_movies(&self, movie_ids: &[MovieId]) -> AppResult<Vec<(GenreId, MovieId)>> {
        Ok(self
            .movies
            .iter()
            .filter(|m| movie_ids.contains(&m.movie_id))
            .flat_map(|m| m.genre_ids.iter().map(move |&g| (g, m.movie_id)))
            .collect())
    }

    async fn cast_for_movies(
        &self,
        movie_ids: &[MovieId],
        roles: &[CastRole],
    ) -> AppResult<Vec<(PersonId, MovieId)>> {
        Ok(self
            .credits
            .iter()
            .filter(|(m, _, role)| movie_ids.contains(m) && roles.contains(role))
            .map(|&(m, p, _)| (p, m))
            .collect())
    }

    async fn candidates(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
    ) -> AppResult<Vec<CandidateMovie>> {
        let mut movies: Vec<CandidateMovie> = self
            .movies
            .iter()
            .filter(|m| m.average_rating >= min_rating && !exclude.contains(&m.movie_id))
            .cloned()
            .collect();
        movies.sort_by_key(|m| m.movie_id);
        Ok(movies)
    }

    async fn popular(
        &self,
        min_rating: f64,
        exclude: &[MovieId],
        limit: usize,
    ) -> AppResult<Vec<CandidateMovie>> {
        let mut movies = self.candidates(min_rating, exclude).await?;
        movies.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        movies.truncate(limit);
        Ok(movies)
    }

    async fn public_comment_count(&self, movie_id: MovieId) -> AppResult<i64> {
        Ok(self.comment_counts.get(&movie_id).copied().unwrap_or(0))
    }
}

/// Similar-movie source answering from a fixed table
#[derive(Default)]
pub struct FixedSimilar {
    lists: HashMap<MovieId, Vec<RecommendedMovie>>,
    failing: bool,
}

impl FixedSimilar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_similar(mut self, movie_id: MovieId, similar_ids: &[MovieId]) -> Self {
        self.lists.insert(
            movie_id,
            similar_ids
                .iter()
                .map(|&id| RecommendedMovie {
                    movie_id: id,
                    title: format!("Similar {}", id),
                    poster_url: None,
                })
                .collect(),
        );
        self
    }
}

#[async_trait::async_trait]
impl SimilarMoviesSource for FixedSimilar {
    async fn similar_movies(&self, movie_id: MovieId, _page: u32) -> AppResult<Vec<RecommendedMovie>> {
        if self.failing {
            return Err(AppError::ExternalApi("TMDB returned status 503".to_string()));
        }
        Ok(self.lists.get(&movie_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub fn service(store: InMemoryStore, similar: FixedSimilar, policy: RngPolicy) -> RecommendationService {
    let store = Arc::new(store);
    RecommendationService::new(store.clone(), store, Arc::new(similar))
        .with_rng_policy(policy)
        .with_external_timeout(Duration::from_secs(2))
}

pub fn ids(movies: &[RecommendedMovie]) -> Vec<MovieId> {
    movies.iter().map(|m| m.movie_id).collect()
}
