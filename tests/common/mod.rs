#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::mpsc;

use shorten_uri::domain::click_event::ClickEvent;
use shorten_uri::domain::code_generator::CodeGenerator;
use shorten_uri::domain::repositories::LinkRepository;
use shorten_uri::infrastructure::persistence::InMemoryLinkRepository;
use shorten_uri::state::AppState;
use shorten_uri::utils::code_generator::{RandomCodeGenerator, SequenceCodeGenerator};

pub const BASE_URL: &str = "http://sho.rt";

/// State over a fresh in-memory store with random codes.
pub fn create_test_state() -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(RandomCodeGenerator::new()),
        100,
    )
}

/// State whose generator replays `codes` in order.
pub fn create_sequenced_state(codes: &[&str]) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(SequenceCodeGenerator::new(codes.iter().copied())),
        100,
    )
}

pub fn create_test_state_with(
    repo: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let state = AppState::new(repo, generator, BASE_URL, 5, tx);

    (state, rx)
}

/// Records every queued click, as the background worker would.
pub async fn drain_clicks(state: &AppState, rx: &mut mpsc::Receiver<ClickEvent>) -> usize {
    let mut processed = 0;
    while let Ok(event) = rx.try_recv() {
        state
            .redirect_service
            .record_click(&event.code)
            .await
            .unwrap();
        processed += 1;
    }
    processed
}
