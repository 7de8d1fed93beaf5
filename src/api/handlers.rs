use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Extension, Json,
};
use futures::StreamExt;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MoodRequest, StreamEvent},
    services::recommendations,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "provider": state.provider.name() })),
    )
}

/// Streams recommendations for the submitted mood as server-sent events
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<MoodRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|e| AppError::RequestBody(e.body_text()))?;

    if request.feeling.trim().is_empty() {
        return Err(AppError::InvalidInput("feeling must not be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        feeling_len = request.feeling.len(),
        provider = state.provider.name(),
        "Processing recommendation request"
    );

    let events =
        recommendations::generate(state.provider.as_ref(), &state.settings, &request.feeling)
            .await?;

    let stream = events
        .inspect(move |event| log_event(&request_id, event))
        .map(|event| Event::default().json_data(&event));

    let sse = Sse::new(stream).keep_alive(KeepAlive::default());
    let headers = [(header::CONNECTION, HeaderValue::from_static("keep-alive"))];

    Ok((headers, sse).into_response())
}

fn log_event(request_id: &RequestId, event: &StreamEvent) {
    match event {
        StreamEvent::Partial { section, .. } => {
            tracing::debug!(request_id = %request_id, section = %section, "Section sent")
        }
        StreamEvent::Complete { .. } => {
            tracing::info!(request_id = %request_id, "Recommendations completed")
        }
        StreamEvent::Error { error } => {
            tracing::warn!(request_id = %request_id, error = %error, "Recommendations failed")
        }
        StreamEvent::Progress { .. } => {}
    }
}
