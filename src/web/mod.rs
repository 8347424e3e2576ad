//! HTTP query surface: a small axum app exposing the in-memory [`Index`]
//! over `/api/query` and `/api/random`. Thin by design; all of the real work
//! happens in `wikipath-core`.

pub mod error;
pub mod query;
pub mod random;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use wikipath_core::Index;

pub struct AppState {
    pub index: Arc<Index>,
    pub max_depth: Option<usize>,
}

pub async fn serve(index: Arc<Index>, listen_addr: &str, max_depth: Option<usize>) -> anyhow::Result<()> {
    let state = Arc::new(AppState { index, max_depth });

    let app = Router::new()
        .route("/api/query", get(query::handler))
        .route("/api/random", get(random::handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: std::net::SocketAddr = listen_addr.parse()?;
    log::info!("listening on {addr}");
    axum::Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
