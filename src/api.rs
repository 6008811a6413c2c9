use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::cors::CorsLayer;

use crate::store::{DynNewsStore, NewsRecord};

#[derive(Clone)]
pub struct AppState {
    pub store: DynNewsStore,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(list_news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Everything the pipeline has persisted, title-ordered.
async fn list_news(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsRecord>>, (StatusCode, String)> {
    match state.store.read_all() {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!(error = ?e, "reading news records failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "store read failed".to_string()))
        }
    }
}
