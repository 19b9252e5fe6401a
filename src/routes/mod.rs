pub mod index;
pub mod invites;
pub mod stats;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::error::AppError;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(index::router())
        .merge(invites::router())
        .merge(stats::router())
}

pub fn app(state: AppState) -> Router {
    let mut router = api_router();

    if let Some(dir) = &state.config.static_dir {
        tracing::info!("Serving static files from {dir}");
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .fallback(|| async { AppError::NotFound })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
