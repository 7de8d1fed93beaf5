//! Recommendation requester: submits a mood and follows the event stream.
//!
//! The requester keeps one [`ViewState`] per screen and calls a redraw hook
//! after every transition, so a front end only has to render the state it is
//! handed.

mod decoder;
mod state;

pub use decoder::EventDecoder;
pub use state::ViewState;

use futures::StreamExt;
use reqwest::Client as HttpClient;

use crate::models::{ErrorBody, MoodRequest};

/// Shown when the server gives no usable error message
pub const GENERIC_ERROR: &str = "Failed to get recommendations";

/// Shown when the stream closes without `complete` or `error`
pub const INCOMPLETE_STREAM_ERROR: &str = "Connection closed before recommendations were complete";

/// HTTP client for the recommendation endpoint
#[derive(Clone)]
pub struct RecommendationClient {
    http_client: HttpClient,
    endpoint: String,
}

impl RecommendationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    /// Runs one submission to completion, updating `view` and calling
    /// `redraw` after each change.
    ///
    /// Returns `false` without touching `view` when the input is blank or a
    /// previous submission is still loading.
    pub async fn request<F>(&self, feeling: &str, view: &mut ViewState, mut redraw: F) -> bool
    where
        F: FnMut(&ViewState),
    {
        if feeling.trim().is_empty() || !view.begin() {
            return false;
        }
        redraw(view);

        if let Err(message) = self.follow(feeling, view, &mut redraw).await {
            tracing::warn!(error = %message, "Recommendation request failed");
            view.fail(message);
            redraw(view);
        }

        true
    }

    async fn follow<F>(&self, feeling: &str, view: &mut ViewState, redraw: &mut F) -> Result<(), String>
    where
        F: FnMut(&ViewState),
    {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&MoodRequest {
                feeling: feeling.to_string(),
            })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) if !body.error.is_empty() => body.error,
                _ => GENERIC_ERROR.to_string(),
            };
            return Err(message);
        }

        let mut decoder = EventDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(|e| e.to_string())?;
            for event in decoder.push(&bytes) {
                view.apply(event);
                redraw(view);
            }
        }

        if let Some(event) = decoder.finish() {
            view.apply(event);
            redraw(view);
        }

        if view.is_settled() {
            Ok(())
        } else {
            Err(INCOMPLETE_STREAM_ERROR.to_string())
        }
    }
}
