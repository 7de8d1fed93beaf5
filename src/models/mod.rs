//! Data carried between the model, the server and the requester.

pub mod event;
pub mod recommendation;

pub use event::{Stage, StreamEvent};
pub use recommendation::{
    is_complete_section, Category, PartialRecommendations, Recommendation, RecommendationSet,
    SECTION_SIZE,
};

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodRequest {
    pub feeling: String,
}

/// Body of a non-streaming failure response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}
