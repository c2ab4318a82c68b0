use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Mounts the task routes next to the health probe and traces every request.
pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(TraceLayer::new_for_http())
}
