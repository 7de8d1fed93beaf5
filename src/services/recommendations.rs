use std::{pin::Pin, time::Duration};

use futures::{Stream, StreamExt};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Stage, StreamEvent},
    services::{
        extractor::SectionScanner,
        prompt::{user_message, SYSTEM_PROMPT},
        providers::{CompletionRequest, ModelProvider, TokenStream},
    },
};

/// Recommendation events in emission order
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Per-request knobs of the recommendation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Longest wait for the next model token; `None` waits forever
    pub idle_timeout: Option<Duration>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_tokens: 1500,
            idle_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl From<&Config> for GeneratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            idle_timeout: (config.upstream_idle_timeout_secs > 0)
                .then(|| Duration::from_secs(config.upstream_idle_timeout_secs)),
        }
    }
}

/// Generates mood-based recommendations as a stream of events
///
/// Opens the model stream up front so that connection and credential failures
/// surface as an error response instead of an event stream. The returned
/// stream owns the model stream: dropping it (e.g. when the HTTP client goes
/// away) closes the upstream request.
pub async fn generate(
    provider: &dyn ModelProvider,
    settings: &GeneratorSettings,
    feeling: &str,
) -> AppResult<EventStream> {
    let request = CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: user_message(feeling),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    };

    let tokens = provider.stream_completion(request).await?;
    Ok(Box::pin(relay(tokens, settings.idle_timeout)))
}

/// Turns model tokens into recommendation events
///
/// Always starts with `progress(analyzing)` and always ends with exactly one
/// `complete` or `error`.
pub fn relay(
    mut tokens: TokenStream,
    idle_timeout: Option<Duration>,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let mut scanner = SectionScanner::new();
        let mut failure = None;

        yield StreamEvent::progress(Stage::Analyzing);

        loop {
            let next = match idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, tokens.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        failure = Some(AppError::Timeout(format!(
                            "no model output for {} seconds",
                            limit.as_secs()
                        )));
                        break;
                    }
                },
                None => tokens.next().await,
            };

            match next {
                Some(Ok(chunk)) => {
                    for event in scanner.push(&chunk) {
                        yield event;
                    }
                }
                Some(Err(e)) => {
                    failure = Some(e);
                    break;
                }
                None => break,
            }
        }

        match failure {
            Some(e) => {
                tracing::warn!(error = %e, received = scanner.buffer().len(), "Model stream failed");
                yield StreamEvent::error(e.to_string());
            }
            None => {
                for event in scanner.finish() {
                    if let StreamEvent::Error { error } = &event {
                        tracing::warn!(error = %error, "Recommendation stream ended with error");
                    }
                    yield event;
                }
            }
        }
    }
}
