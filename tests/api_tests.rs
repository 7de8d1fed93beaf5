mod common;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use common::{ScriptedModel, RESPONSE};
use moodmatch::{
    client::EventDecoder,
    models::{Category, RecommendationSet, Stage, StreamEvent},
};

fn create_test_server(model: Arc<ScriptedModel>) -> TestServer {
    TestServer::new(common::app(model)).unwrap()
}

fn decode(body: &str) -> Vec<StreamEvent> {
    let mut decoder = EventDecoder::new();
    let mut events = decoder.push(body.as_bytes());
    events.extend(decoder.finish());
    events
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(ScriptedModel::new(vec![])));
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "scripted");
}

#[tokio::test]
async fn test_single_chunk_end_to_end() {
    let model = Arc::new(ScriptedModel::new(vec![RESPONSE]));
    let server = create_test_server(model.clone());

    let response = server
        .post("/api/chat")
        .json(&json!({ "feeling": "overwhelmed and tired" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/event-stream");
    assert_eq!(response.header("cache-control"), "no-cache");
    assert_eq!(response.header("connection"), "keep-alive");

    let body = response.text();
    assert!(body.starts_with("data: {\"type\":\"progress\",\"stage\":\"analyzing\""));
    assert!(body.ends_with("\n\n"));

    let events = decode(&body);
    let expected: RecommendationSet = serde_json::from_str(RESPONSE).unwrap();
    assert_eq!(
        events,
        vec![
            StreamEvent::progress(Stage::Analyzing),
            StreamEvent::progress(Stage::Books),
            StreamEvent::partial(Category::Books, expected.books.clone()),
            StreamEvent::progress(Stage::Meals),
            StreamEvent::partial(Category::Meals, expected.meals.clone()),
            StreamEvent::progress(Stage::Activities),
            StreamEvent::partial(Category::Activities, expected.activities.clone()),
            StreamEvent::Complete { data: expected },
        ]
    );

    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user, "How are you feeling? overwhelmed and tired");
    assert_eq!(requests[0].temperature, 0.8);
}

#[tokio::test]
async fn test_token_by_token_stream() {
    let server = create_test_server(Arc::new(ScriptedModel::chunked(RESPONSE, 3)));

    let response = server
        .post("/api/chat")
        .json(&json!({ "feeling": "anxious" }))
        .await;
    response.assert_status_ok();

    let events = decode(&response.text());
    let partials: Vec<Category> = events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Partial { section, .. } => Some(*section),
            _ => None,
        })
        .collect();
    assert_eq!(
        partials,
        vec![Category::Books, Category::Meals, Category::Activities]
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(matches!(events.last(), Some(StreamEvent::Complete { .. })));
}

#[tokio::test]
async fn test_invalid_model_output_streams_error() {
    let model = ScriptedModel::new(vec!["I'd rather ", "talk about ", "the weather."]);
    let server = create_test_server(Arc::new(model));

    let response = server
        .post("/api/chat")
        .json(&json!({ "feeling": "bored" }))
        .await;
    response.assert_status_ok();

    let events = decode(&response.text());
    assert_eq!(
        events,
        vec![
            StreamEvent::progress(Stage::Analyzing),
            StreamEvent::error("No valid JSON found in response"),
        ]
    );
}

#[tokio::test]
async fn test_unreadable_body_is_server_error() {
    let server = create_test_server(Arc::new(ScriptedModel::new(vec![RESPONSE])));

    let response = server
        .post("/api/chat")
        .json(&json!({ "mood": "happy" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to read request");
    assert!(body["details"].as_str().unwrap().contains("feeling"));
}

#[tokio::test]
async fn test_blank_feeling_is_rejected() {
    let model = Arc::new(ScriptedModel::new(vec![RESPONSE]));
    let server = create_test_server(model.clone());

    let response = server
        .post("/api/chat")
        .json(&json!({ "feeling": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_setup_failure_is_json_error() {
    let server = create_test_server(Arc::new(ScriptedModel::failing(
        "API returned status 401 Unauthorized",
    )));

    let response = server
        .post("/api/chat")
        .json(&json!({ "feeling": "stressed" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to get response from AI");
    assert!(body["details"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(Arc::new(ScriptedModel::new(vec![RESPONSE])));

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("browser-session-7"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "browser-session-7");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}
