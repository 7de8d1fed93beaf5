/// OpenAI chat completions provider
///
/// Streams `/chat/completions` with `stream: true` and turns the SSE frames
/// into plain text fragments.
use crate::{
    error::{AppError, AppResult},
    services::providers::{CompletionRequest, ModelProvider, TokenStream},
    sse::{data_payload, LineBuffer},
};
use futures::{Stream, StreamExt};
use reqwest::{header, Client as HttpClient};
use serde::{Deserialize, Serialize};

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorFrame {
    error: UpstreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

/// Meaning of one upstream SSE line
#[derive(Debug, PartialEq)]
enum Frame {
    Token(String),
    Done,
    Skip,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
        ChatCompletionBody {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: true,
        }
    }
}

/// Interprets one line of the upstream event stream
fn parse_line(line: &str) -> AppResult<Frame> {
    let Some(payload) = data_payload(line) else {
        return Ok(Frame::Skip);
    };
    let payload = payload.trim();
    if payload == DONE_MARKER {
        return Ok(Frame::Done);
    }

    if let Ok(frame) = serde_json::from_str::<UpstreamErrorFrame>(payload) {
        return Err(AppError::ExternalApi(frame.error.message));
    }

    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => Ok(chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map_or(Frame::Skip, Frame::Token)),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping unrecognized upstream frame");
            Ok(Frame::Skip)
        }
    }
}

/// Turns the raw response body into text fragments.
///
/// Ends at `[DONE]`, at the first error, or when the body ends. In the last
/// case an unterminated final line is still read.
fn decode_body<S, B>(body: S) -> TokenStream
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let tokens = async_stream::stream! {
        let mut body = Box::pin(body);
        let mut lines = LineBuffer::new();
        'read: {
            while let Some(bytes) = body.next().await {
                let bytes = match bytes {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(AppError::from(e));
                        break 'read;
                    }
                };
                for line in lines.push(bytes.as_ref()) {
                    match parse_line(&line) {
                        Ok(Frame::Token(token)) => yield Ok(token),
                        Ok(Frame::Done) => break 'read,
                        Ok(Frame::Skip) => {}
                        Err(e) => {
                            yield Err(e);
                            break 'read;
                        }
                    }
                }
            }

            if let Some(line) = lines.finish() {
                match parse_line(&line) {
                    Ok(Frame::Token(token)) => yield Ok(token),
                    Ok(Frame::Done | Frame::Skip) => {}
                    Err(e) => yield Err(e),
                }
            }
        }
    };

    Box::pin(tokens)
}

#[async_trait::async_trait]
impl ModelProvider for OpenAiProvider {
    async fn stream_completion(&self, request: CompletionRequest) -> AppResult<TokenStream> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "text/event-stream")
            .json(&self.body(&request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        tracing::info!(
            model = %self.model,
            provider = self.name(),
            "Completion stream opened"
        );

        Ok(decode_body(response.bytes_stream()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
