//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// `/countries/refresh`, `/countries/status` and `/countries/image` are
/// static segments and take precedence over the `/countries/{name}` capture.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/countries", get(handlers::list_countries))
        .route("/countries/refresh", post(handlers::refresh_countries))
        .route("/countries/status", get(handlers::get_status))
        .route("/countries/image", get(handlers::get_summary_image))
        .route(
            "/countries/{name}",
            get(handlers::get_country).delete(handlers::delete_country),
        )
        .fallback(handlers::endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
