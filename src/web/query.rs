use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use wikipath_core::{Index, QueryError};

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub from: String,
    pub to: String,
    pub path: Vec<String>,
    pub duration: f64,
    pub touched: usize,
}

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, ApiError> {
    let index: Arc<Index> = Arc::clone(&state.index);
    let max_depth = state.max_depth;
    let from = params.from.clone();
    let to = params.to.clone();

    let start = Instant::now();
    let (path, touched) =
        tokio::task::spawn_blocking(move || index.find_path(&params.from, &params.to, max_depth))
            .await
            .expect("find_path task panicked")?;
    let duration = start.elapsed().as_secs_f64();

    let path = path.ok_or(QueryError::NoPath)?;

    log::info!("'{from}' -> '{to}' in {duration:.2}");

    Ok(Json(QueryResponse {
        from,
        to,
        path,
        duration,
        touched,
    }))
}
