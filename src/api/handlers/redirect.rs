//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, warn};

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoints
///
/// - `GET /{code}`
/// - `GET /api/urls/redirect/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (expiration checked against the current time)
/// 2. Queue a click event for the background worker
/// 3. Return 307 Temporary Redirect
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for async processing. When the
/// queue is full the click is recorded by a spawned task instead, so the response
/// is never held up and no successful redirect goes uncounted. Only a closed
/// queue (shutdown) drops the click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.redirect_service.resolve(&code).await?;

    match state.click_sender.try_send(ClickEvent::new(code)) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("click_events_overflow_total").increment(1);
            warn!(code = %event.code, "Click queue full, recording click out of band");

            let service = state.redirect_service.clone();
            tokio::spawn(async move {
                if let Err(e) = service.record_click(&event.code).await {
                    metrics::counter!("click_events_failed_total").increment(1);
                    error!(code = %event.code, error = %e, "Failed to record click");
                }
            });
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("click_events_dropped_total").increment(1);
            warn!(code = %event.code, "Click queue closed, dropping click");
        }
    }

    Ok(Redirect::temporary(&long_url))
}
