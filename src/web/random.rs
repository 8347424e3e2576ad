use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use wikipath_core::QueryError;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Serialize)]
pub struct RandomResponse {
    pub title: String,
}

pub async fn handler(State(state): State<Arc<AppState>>) -> Result<Json<RandomResponse>, ApiError> {
    let title = state
        .index
        .random_title()
        .ok_or(QueryError::EmptyIndex)?
        .to_owned();
    Ok(Json(RandomResponse { title }))
}
