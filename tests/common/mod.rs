#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures::stream;
use moodmatch::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    services::{
        providers::{CompletionRequest, ModelProvider, TokenStream},
        recommendations::GeneratorSettings,
    },
};

pub const RESPONSE: &str = r#"{
  "books": [
    {"title": "Wintering", "reason": "Treats exhaustion as a season, not a failure"},
    {"title": "The Comfort Book", "reason": "Short chapters for a tired mind"},
    {"title": "Rest", "reason": "Makes the case for doing less"}
  ],
  "meals": [
    {"title": "Miso soup", "reason": "Warm, light and ready in minutes"},
    {"title": "Congee", "reason": "Soothing when energy is low"},
    {"title": "Avocado toast", "reason": "Nourishing with almost no effort"}
  ],
  "activities": [
    {"title": "A twenty-minute nap", "reason": "Takes the edge off fatigue"},
    {"title": "A slow walk outside", "reason": "Daylight lifts the mood"},
    {"title": "A brain dump", "reason": "Gets the to-do list out of your head"}
  ]
}"#;

/// Model double that replays fixed text fragments
pub struct ScriptedModel {
    chunks: Vec<String>,
    open_error: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(chunks: Vec<&str>) -> Self {
        Self {
            chunks: chunks.into_iter().map(str::to_string).collect(),
            open_error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Splits `text` into fragments of `size` characters
    pub fn chunked(text: &str, size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let chunks: Vec<String> = chars.chunks(size).map(|c| c.iter().collect()).collect();
        Self {
            chunks,
            open_error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            chunks: Vec::new(),
            open_error: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for ScriptedModel {
    async fn stream_completion(&self, request: CompletionRequest) -> AppResult<TokenStream> {
        self.requests.lock().unwrap().push(request);
        if let Some(message) = &self.open_error {
            return Err(AppError::ExternalApi(message.clone()));
        }
        let items: Vec<AppResult<String>> = self.chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn app(model: Arc<ScriptedModel>) -> axum::Router {
    create_router(AppState::new(model, GeneratorSettings::default()))
}
