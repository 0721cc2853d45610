//! Shared application state injected into all handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::click_event::ClickEvent;
use crate::domain::code_generator::CodeGenerator;
use crate::domain::repositories::LinkRepository;

/// Link service over type-erased storage and code generation.
pub type DynLinkService = LinkService<dyn LinkRepository, dyn CodeGenerator>;

/// Redirect service over type-erased storage.
pub type DynRedirectService = RedirectService<dyn LinkRepository>;

/// Services and channels shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Wires both services onto one repository.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        code_generator: Arc<dyn CodeGenerator>,
        base_url: &str,
        code_max_attempts: usize,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        let link_service = LinkService::new(link_repository.clone(), code_generator, base_url)
            .with_max_attempts(code_max_attempts);
        let redirect_service = RedirectService::new(link_repository, base_url);

        Self {
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(redirect_service),
            click_sender,
        }
    }
}
