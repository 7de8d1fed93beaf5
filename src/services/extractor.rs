//! Incremental extraction of recommendation sections from a partial model response.
//!
//! The model streams one JSON object with `books`, `meals` and `activities`
//! arrays. While tokens arrive, [`SectionScanner`] watches the growing buffer
//! and releases each array as soon as it is syntactically closed and holds a
//! full section. Anything that does not parse yet is simply "not ready"; only
//! the final parse in [`SectionScanner::finish`] can fail the request.

use crate::{
    error::{AppError, AppResult},
    models::{is_complete_section, Category, Recommendation, RecommendationSet, StreamEvent},
};

/// Scans accumulated model output for completed category arrays
#[derive(Debug, Default)]
pub struct SectionScanner {
    buffer: String,
    /// Byte offset just past the last emitted array
    cursor: usize,
    /// Index into [`Category::ALL`] of the next category to look for
    next: usize,
}

impl SectionScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token batch and returns the events it unlocked.
    ///
    /// Categories are released strictly in `books`, `meals`, `activities`
    /// order, and the search for a category starts after the array of the
    /// previous one, so a key appearing out of order is left to the final
    /// parse.
    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        while let Some(&category) = Category::ALL.get(self.next) {
            let Some((items, consumed)) = extract_section(&self.buffer[self.cursor..], category.key())
            else {
                break;
            };

            tracing::debug!(section = %category, "Section complete");
            self.cursor += consumed;
            self.next += 1;
            events.push(StreamEvent::progress(category.into()));
            events.push(StreamEvent::partial(category, items));
        }

        events
    }

    #[cfg(test)]
    fn is_emitted(&self, category: Category) -> bool {
        Category::ALL[..self.next].contains(&category)
    }

    /// Text received so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Parses the whole response once the token stream has ended.
    ///
    /// Sections not released during scanning are sent now, followed by
    /// `complete`. If the text does not hold a recommendation object the
    /// result is a single `error` event.
    pub fn finish(self) -> Vec<StreamEvent> {
        let set = match parse_final(&self.buffer) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, length = self.buffer.len(), "Final parse failed");
                return vec![StreamEvent::error(e.to_string())];
            }
        };

        let mut events: Vec<StreamEvent> = Category::ALL[self.next..]
            .iter()
            .map(|category| StreamEvent::partial(*category, set.section(*category).to_vec()))
            .collect();
        events.push(StreamEvent::Complete { data: set });
        events
    }
}

/// Finds the array stored under `key` and returns it with the byte offset
/// just past its closing bracket, if it is closed and holds a full section.
fn extract_section(text: &str, key: &str) -> Option<(Vec<Recommendation>, usize)> {
    let needle = format!("\"{key}\"");
    let mut from = 0;

    while let Some(found) = text[from..].find(&needle) {
        let key_end = from + found + needle.len();
        match array_after_key(&text[key_end..]) {
            KeyFollow::Array(offset) => {
                let start = key_end + offset;
                let end = start + matching_bracket(&text[start..])?;
                match serde_json::from_str::<Vec<Recommendation>>(&text[start..=end]) {
                    Ok(items) if is_complete_section(&items) => return Some((items, end + 1)),
                    // A closed array never changes; a repeated key may still follow
                    _ => from = end + 1,
                }
            }
            KeyFollow::Pending => return None,
            KeyFollow::NotAKey => from = key_end,
        }
    }

    None
}

enum KeyFollow {
    /// Offset of the `[` opening the value
    Array(usize),
    /// Buffer ends before the value starts
    Pending,
    /// The quoted word is not an object key with an array value
    NotAKey,
}

fn array_after_key(rest: &str) -> KeyFollow {
    let mut chars = rest.char_indices().filter(|(_, c)| !c.is_whitespace());

    match chars.next() {
        None => return KeyFollow::Pending,
        Some((_, ':')) => {}
        Some(_) => return KeyFollow::NotAKey,
    }
    match chars.next() {
        None => KeyFollow::Pending,
        Some((i, '[')) => KeyFollow::Array(i),
        Some(_) => KeyFollow::NotAKey,
    }
}

/// Offset of the bracket closing the `[` at the start of `text`.
/// Brackets inside string literals do not count.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses a complete model response into a recommendation set.
///
/// Tolerates a markdown code fence and stray text around the object: the
/// JSON is taken from the first `{` to the last `}`.
pub fn parse_final(text: &str) -> AppResult<RecommendationSet> {
    let body = strip_code_fence(text.trim());

    let (start, end) = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(AppError::MalformedResponse(
                "No valid JSON found in response".to_string(),
            ))
        }
    };

    // Going through `Value` keeps the last occurrence of a repeated key
    serde_json::from_str::<serde_json::Value>(&body[start..=end])
        .and_then(serde_json::from_value)
        .map_err(|e| AppError::MalformedResponse(format!("Failed to parse recommendations: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.strip_suffix('\n').unwrap_or(rest)
}
