//! Background worker that turns queued click events into counter increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::application::services::RedirectService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Retries after the first failed attempt, for transient storage errors only.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` events are processed at once. Each event is recorded with
/// [`RedirectService::record_click`]; [`AppError::Internal`] failures are retried
/// with jittered exponential backoff, anything else is logged and dropped.
/// In-flight events are drained before the worker returns.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    redirect_service: Arc<RedirectService<R>>,
    concurrency: usize,
) where
    R: LinkRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let service = redirect_service.clone();
        tasks.spawn(async move {
            let _permit = permit;
            process_click(&service, event).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn process_click<R>(service: &RedirectService<R>, event: ClickEvent)
where
    R: LinkRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::start(
        strategy,
        || service.record_click(&event.code),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match result {
        Ok(()) => debug!(code = %event.code, clicked_at = %event.clicked_at, "Click processed"),
        Err(e) => {
            metrics::counter!("click_events_failed_total").increment(1);
            error!(code = %event.code, error = %e, "Failed to record click");
        }
    }
}
