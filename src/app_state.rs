use std::sync::Arc;

use crate::repositories::Repository;

/// Shared state handed to every handler. The repository is built once at
/// startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}
