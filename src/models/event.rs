use serde::{Deserialize, Serialize};

use super::recommendation::{Category, Recommendation, RecommendationSet};

/// Cosmetic progress marker shown while a request is in flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Analyzing,
    Books,
    Meals,
    Activities,
}

impl Stage {
    pub fn message(self) -> &'static str {
        match self {
            Stage::Analyzing => "Analyzing your feelings...",
            Stage::Books => Category::Books.progress_message(),
            Stage::Meals => Category::Meals.progress_message(),
            Stage::Activities => Category::Activities.progress_message(),
        }
    }
}

impl From<Category> for Stage {
    fn from(category: Category) -> Self {
        match category {
            Category::Books => Stage::Books,
            Category::Meals => Stage::Meals,
            Category::Activities => Stage::Activities,
        }
    }
}

/// One server-sent event of the recommendation stream.
///
/// A stream is a run of `progress`/`partial` events closed by exactly one
/// `complete` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Progress {
        stage: Stage,
        message: String,
    },
    Partial {
        section: Category,
        data: Vec<Recommendation>,
    },
    Complete {
        data: RecommendationSet,
    },
    Error {
        error: String,
    },
}

impl StreamEvent {
    pub fn progress(stage: Stage) -> Self {
        StreamEvent::Progress {
            stage,
            message: stage.message().to_string(),
        }
    }

    pub fn partial(section: Category, data: Vec<Recommendation>) -> Self {
        StreamEvent::Partial { section, data }
    }

    pub fn error(error: impl Into<String>) -> Self {
        StreamEvent::Error {
            error: error.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete { .. } | StreamEvent::Error { .. })
    }

    /// Event kind as it appears in the `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::Partial { .. } => "partial",
            StreamEvent::Complete { .. } => "complete",
            StreamEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress_wire_shape() {
        let event = StreamEvent::progress(Stage::Analyzing);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "progress",
                "stage": "analyzing",
                "message": "Analyzing your feelings..."
            })
        );
    }

    #[test]
    fn test_partial_wire_shape() {
        let event = StreamEvent::partial(
            Category::Books,
            vec![Recommendation::new("Dune", "Escape into another world")],
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "partial");
        assert_eq!(value["section"], "books");
        assert_eq!(value["data"][0]["title"], "Dune");
    }

    #[test]
    fn test_error_wire_shape() {
        let value = serde_json::to_value(StreamEvent::error("boom")).unwrap();
        assert_eq!(value, json!({ "type": "error", "error": "boom" }));
    }

    #[test]
    fn test_complete_deserialization() {
        let json = r#"{
            "type": "complete",
            "data": {
                "books": [{"title": "A", "reason": "a"}],
                "meals": [{"title": "B", "reason": "b"}],
                "activities": [{"title": "C", "reason": "c"}]
            }
        }"#;

        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_terminal());
        match event {
            StreamEvent::Complete { data } => assert_eq!(data.meals[0].title, "B"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_category_stage_messages() {
        assert_eq!(Stage::from(Category::Meals), Stage::Meals);
        assert_eq!(Stage::Activities.message(), "Finding activities...");
        assert!(!StreamEvent::progress(Stage::Books).is_terminal());
    }
}
