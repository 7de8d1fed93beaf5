use crate::{
    models::StreamEvent,
    sse::{data_payload, LineBuffer},
};

/// Decodes the server's event stream from raw body bytes
#[derive(Debug, Default)]
pub struct EventDecoder {
    lines: LineBuffer,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one read of the response body
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.lines
            .push(bytes)
            .iter()
            .filter_map(|line| decode_line(line))
            .collect()
    }

    /// Decodes whatever is left once the body has ended
    pub fn finish(&mut self) -> Option<StreamEvent> {
        self.lines.finish().and_then(|line| decode_line(&line))
    }
}

/// Malformed payloads are dropped; the stream carries on
fn decode_line(line: &str) -> Option<StreamEvent> {
    let payload = data_payload(line)?;
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping malformed event line");
            None
        }
    }
}
