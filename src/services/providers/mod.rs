use std::pin::Pin;

use futures::Stream;

/// Language model provider abstraction
///
/// The recommendation pipeline only needs one thing from a model: a stream of
/// text fragments whose concatenation is the response. Providers hide the
/// transport and framing of their API behind this trait.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiProvider;

/// Text fragments in arrival order; an `Err` ends the stream
pub type TokenStream = Pin<Box<dyn Stream<Item = AppResult<String>> + Send>>;

/// One streaming completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instruction sent as the system message
    pub system: String,
    /// The user's message
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for streaming completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelProvider: Send + Sync {
    /// Opens a streaming completion
    ///
    /// Errors returned here happen before any text is produced (connection
    /// refused, rejected credentials). Failures after the stream has started
    /// are delivered as items of the returned stream.
    async fn stream_completion(&self, request: CompletionRequest) -> AppResult<TokenStream>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
