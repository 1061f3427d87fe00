/// TMDB similar-movies client
///
/// Calls `/movie/{id}/similar` with a v4 bearer token and maps results to
/// [`RecommendedMovie`], resolving poster paths against the image CDN.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, RecommendedMovie, TmdbMovie, TmdbPage},
    services::similar::SimilarMoviesSource,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const POSTER_SIZE: &str = "w500";

/// Connection settings for [`TmdbClient`]
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_url: String,
    pub access_token: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout: Duration,
    pub cache_ttl_secs: u64,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    config: TmdbConfig,
    cache: Option<Cache>,
}

impl TmdbClient {
    /// Creates a client. Responses are cached only when `cache` is provided.
    pub fn new(config: TmdbConfig, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            config,
            cache,
        })
    }

    fn image_url(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}{}{}", self.config.image_base_url, POSTER_SIZE, p))
    }

    fn to_recommended(&self, movie: TmdbMovie) -> RecommendedMovie {
        RecommendedMovie {
            poster_url: self.image_url(movie.poster_path.as_deref()),
            movie_id: movie.id,
            title: movie.title,
        }
    }

    async fn request_similar(&self, movie_id: MovieId, page: u32) -> AppResult<Vec<RecommendedMovie>> {
        let url = format!("{}/movie/{}/similar", self.config.api_url, movie_id);
        let page_param = page.to_string();

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .query(&[
                ("language", self.config.language.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage<TmdbMovie> = response.json().await?;
        let movies: Vec<RecommendedMovie> = page
            .results
            .into_iter()
            .map(|movie| self.to_recommended(movie))
            .collect();

        tracing::info!(
            movie_id = movie_id,
            results = movies.len(),
            provider = "tmdb",
            "Similar movies fetched"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl SimilarMoviesSource for TmdbClient {
    async fn similar_movies(&self, movie_id: MovieId, page: u32) -> AppResult<Vec<RecommendedMovie>> {
        let Some(cache) = &self.cache else {
            return self.request_similar(movie_id, page).await;
        };

        let key = CacheKey::SimilarMovies {
            movie_id,
            language: self.config.language.clone(),
            page,
        };

        cached!(
            cache,
            key,
            self.config.cache_ttl_secs,
            self.request_similar(movie_id, page)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
