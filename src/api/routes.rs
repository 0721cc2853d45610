//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, redirect_handler, shorten_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, nested under `/api/urls`.
///
/// # Endpoints
///
/// - `POST   /`                - Shorten a URL
/// - `GET    /{code}`          - Statistics for a link
/// - `DELETE /{code}`          - Delete a link
/// - `GET    /redirect/{code}` - Redirect, same as `GET /{code}` at the root
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(shorten_handler))
        .route("/{code}", get(stats_handler).delete(delete_link_handler))
        .route("/redirect/{code}", get(redirect_handler))
}
