use std::sync::Arc;

use headlines_core::Models;

/// Shared application state. Cloned per request; the models are loaded once.
#[derive(Clone)]
pub struct ServerState {
    pub models: Arc<Models>,
}

impl ServerState {
    pub fn new(models: Models) -> Self {
        Self {
            models: Arc::new(models),
        }
    }
}
