use std::sync::Arc;

use cinemate_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, Cache, PgStore},
    services::{RecommendationService, TmdbClient, TmdbConfig},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinemate_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Connected to Postgres");

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            (Some(cache), Some(handle))
        }
        None => {
            tracing::warn!("REDIS_URL not set, similar-movie responses will not be cached");
            (None, None)
        }
    };

    let tmdb = TmdbClient::new(
        TmdbConfig {
            api_url: config.tmdb_api_url.clone(),
            access_token: config.tmdb_access_token.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            language: config.tmdb_language.clone(),
            timeout: config.tmdb_timeout(),
            cache_ttl_secs: config.similar_cache_ttl_secs,
        },
        cache,
    )?;

    let store = Arc::new(PgStore::new(pool));
    let recommendations = RecommendationService::new(store.clone(), store, Arc::new(tmdb))
        .with_rng_policy(config.recommendation_rng_seed.into())
        .with_external_timeout(config.tmdb_timeout());

    let app = create_router(AppState::new(recommendations));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
