use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::RecommendationResponse,
    services::recommendation::DEFAULT_MIN_RATING,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Ratings below this are ignored when building the taste profile
    pub min_rating: Option<f64>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Personalized recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let min_rating = query.min_rating.unwrap_or(DEFAULT_MIN_RATING);

    if !(0.0..=10.0).contains(&min_rating) {
        return Err(AppError::InvalidInput(format!(
            "min_rating must be between 0 and 10, got {}",
            min_rating
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = user_id,
        min_rating = min_rating,
        "Processing recommendation request"
    );

    let recommendations = state.recommendations.recommend(user_id, min_rating).await;

    Ok(Json(RecommendationResponse {
        user_id,
        recommendations,
    }))
}
