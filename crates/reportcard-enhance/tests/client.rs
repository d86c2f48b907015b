//! Client tests against a local mock of the chat completion endpoint.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use reportcard_core::models::language::Language;
use reportcard_enhance::client::{EnhanceClient, EnhanceConfig, PLACEHOLDER_PREFIX};
use reportcard_enhance::error::EnhanceError;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Seen {
    request: Arc<Mutex<Option<(HeaderMap, Value)>>>,
}

/// Serve `reply` for every completion request and record what was sent.
async fn mock_server(reply: Response) -> (String, Seen) {
    let reply = Arc::new(Mutex::new(Some(reply)));
    let seen = Seen::default();

    let handler = {
        let reply = reply.clone();
        move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| {
            let reply = reply.clone();
            async move {
                *seen.request.lock().unwrap() = Some((headers, body));
                reply
                    .lock()
                    .unwrap()
                    .take()
                    .unwrap_or_else(|| StatusCode::GONE.into_response())
            }
        }
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), seen)
}

fn client(base_url: &str) -> EnhanceClient {
    EnhanceClient::new(EnhanceConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-key".to_string()),
        ..EnhanceConfig::default()
    })
}

fn completion(content: &str) -> Response {
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    }))
    .into_response()
}

#[tokio::test]
async fn successful_enhancement_is_normalised() {
    let (url, seen) =
        mock_server(completion("**Jane** shows [steady](http://x) progress in <b>fractions</b>.")).await;

    let enhanced = client(&url)
        .enhance("  Jane is ok at fractions.  ", Language::En)
        .await
        .unwrap();
    assert_eq!(enhanced, "Jane shows steady progress in fractions.");

    let (headers, body) = seen.request.lock().unwrap().take().unwrap();
    assert_eq!(headers["authorization"], "Bearer test-key");
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["temperature"], 0.7);
    assert_eq!(body["top_p"], 0.95);
    assert_eq!(body["max_tokens"], 150);
    assert_eq!(body["frequency_penalty"], 0.3);
    assert_eq!(body["presence_penalty"], 0.3);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.ends_with("Original text: Jane is ok at fractions."));
}

#[tokio::test]
async fn chinese_requests_use_smaller_budget() {
    let (url, seen) = mock_server(completion("學生表現穩定。")).await;

    let enhanced = client(&url).enhance("表現不錯", Language::Zh).await.unwrap();
    assert_eq!(enhanced, "學生表現穩定。");

    let (_, body) = seen.request.lock().unwrap().take().unwrap();
    assert_eq!(body["max_tokens"], 120);
    assert!(body["messages"][1]["content"].as_str().unwrap().ends_with("原文：表現不錯"));
}

#[tokio::test]
async fn long_replies_are_truncated() {
    let long = vec!["word"; 150].join(" ");
    let (url, _) = mock_server(completion(&long)).await;

    let enhanced = client(&url).enhance("text", Language::En).await.unwrap();
    assert_eq!(enhanced.split_whitespace().count(), 100);
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let reply = (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "message": "Invalid API key" } })),
    )
        .into_response();
    let (url, _) = mock_server(reply).await;

    let err = client(&url).enhance("text", Language::En).await.unwrap_err();
    match err {
        EnhanceError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upstream_error_without_json_uses_status_reason() {
    let reply = (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    let (url, _) = mock_server(reply).await;

    let err = client(&url).enhance("text", Language::En).await.unwrap_err();
    assert!(matches!(
        err,
        EnhanceError::Upstream { status: 500, ref message } if message == "Internal Server Error"
    ));
}

#[tokio::test]
async fn missing_choices_are_malformed() {
    let (url, _) = mock_server(Json(json!({ "choices": [] })).into_response()).await;
    let err = client(&url).enhance("text", Language::En).await.unwrap_err();
    assert!(matches!(err, EnhanceError::MalformedResponse(_)));
}

#[tokio::test]
async fn blank_completion_is_malformed() {
    let (url, _) = mock_server(completion("   ")).await;
    let err = client(&url).enhance("text", Language::En).await.unwrap_err();
    assert!(matches!(err, EnhanceError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let (url, _) = mock_server((StatusCode::OK, "not json").into_response()).await;
    let err = client(&url).enhance("text", Language::En).await.unwrap_err();
    assert!(matches!(err, EnhanceError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_input_is_rejected_before_any_request() {
    let err = client("http://127.0.0.1:9")
        .enhance(" \n ", Language::En)
        .await
        .unwrap_err();
    assert!(matches!(err, EnhanceError::EmptyInput));
}

#[tokio::test]
async fn missing_key_is_a_configuration_error() {
    let client = EnhanceClient::new(EnhanceConfig {
        api_key: Some("   ".to_string()),
        ..EnhanceConfig::default()
    });
    let err = client.enhance("text", Language::En).await.unwrap_err();
    assert!(matches!(err, EnhanceError::Configuration(_)));
}

#[tokio::test]
async fn placeholder_is_returned_when_enabled() {
    let client = EnhanceClient::new(EnhanceConfig {
        placeholder_when_unconfigured: true,
        ..EnhanceConfig::default()
    });
    let text = client.enhance("Works hard.", Language::En).await.unwrap();
    assert_eq!(text, format!("{PLACEHOLDER_PREFIX} Works hard."));
}
