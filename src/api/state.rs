use std::sync::Arc;

use crate::services::{providers::ModelProvider, recommendations::GeneratorSettings};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Upstream language model
    pub provider: Arc<dyn ModelProvider>,
    pub settings: Arc<GeneratorSettings>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: GeneratorSettings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
        }
    }
}
