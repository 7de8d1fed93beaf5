use crate::models::{PartialRecommendations, Stage, StreamEvent};

/// Everything the requester displays for one submission
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub stage: Stage,
    pub message: String,
    pub recommendations: PartialRecommendations,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            message: Stage::Analyzing.message().to_string(),
            ..Self::default()
        }
    }

    /// Starts a new submission. Returns `false`, leaving the state untouched,
    /// while a previous submission is still loading.
    pub fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        *self = Self {
            loading: true,
            ..Self::new()
        };
        true
    }

    /// Applies one server event
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Progress { stage, message } => {
                self.stage = stage;
                self.message = message;
            }
            StreamEvent::Partial { section, data } => self.recommendations.set(section, data),
            StreamEvent::Complete { data } => {
                self.recommendations = data.into();
                self.loading = false;
            }
            StreamEvent::Error { error } => self.fail(error),
        }
    }

    /// Records a failure; sections already shown stay visible
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Whether a terminal event (or local failure) has closed this submission
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}
