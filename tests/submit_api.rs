// tests/submit_api.rs
// Router-level tests for /api/test and /submit against a recording stub client

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use sophia::api::create_router;
use sophia::llm::{ChatResult, LlmClient, Message, Role};
use sophia::persona::{PROFESSOR_PERSONA_PROMPT, PROFESSOR_VOICE_ID, PersonaPrompts, SOPHIA_PERSONA_PROMPT};
use sophia::state::AppState;
use sophia::{RelayError, Result};

const ORIGIN: &str = "http://localhost:3000";

/// Stub provider: records every call and answers with a canned outcome
struct RecordingLlm {
    calls: Mutex<Vec<(Vec<Message>, u32)>>,
    reply: std::result::Result<Option<String>, String>,
}

impl RecordingLlm {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(Some(text.to_string())),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(None),
        })
    }

    fn calls(&self) -> Vec<(Vec<Message>, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for RecordingLlm {
    async fn chat(&self, messages: Vec<Message>, max_tokens: u32) -> Result<ChatResult> {
        self.calls.lock().unwrap().push((messages, max_tokens));
        match &self.reply {
            Ok(content) => Ok(ChatResult {
                request_id: "stub".into(),
                content: content.clone(),
                usage: None,
                duration_ms: 1,
            }),
            Err(message) => Err(RelayError::upstream(message.clone())),
        }
    }

    fn model_name(&self) -> String {
        "stub-model".into()
    }
}

fn app_with(llm: Arc<RecordingLlm>, personas: PersonaPrompts) -> axum::Router {
    let state = AppState::new(llm, personas, 200);
    create_router(state, &[ORIGIN.to_string()]).unwrap()
}

fn app(llm: Arc<RecordingLlm>) -> axum::Router {
    app_with(llm, PersonaPrompts::default())
}

fn submit(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn hello_world_is_constant() {
    let llm = RecordingLlm::replying("unused");
    let router = app(llm.clone());

    for _ in 0..2 {
        let request = Request::builder()
            .uri("/api/test")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Hello World"}));
    }
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn empty_text_is_rejected_without_upstream_call() {
    let llm = RecordingLlm::replying("unused");
    let (status, body) = send(app(llm.clone()), submit(r#"{"text": "", "voiceId": "x"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "text is required"}));
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn missing_text_is_rejected() {
    let llm = RecordingLlm::replying("unused");
    let (status, body) = send(app(llm.clone()), submit(r#"{"voiceId": "x"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "text is required");
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn empty_voice_id_is_rejected() {
    let llm = RecordingLlm::replying("unused");
    let (status, body) = send(app(llm.clone()), submit(r#"{"text": "hi", "voiceId": ""}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "voiceId is required");
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let llm = RecordingLlm::replying("unused");
    let (status, body) = send(app(llm.clone()), submit("{not:json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid request body"));
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn professor_voice_uses_professor_prompt() {
    let llm = RecordingLlm::replying("Profundity is overrated.");
    let body = json!({"text": "Tell me something profound.", "voiceId": PROFESSOR_VOICE_ID}).to_string();
    let (status, response) = send(app(llm.clone()), submit(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"sophia_response": "Profundity is overrated."}));

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    let (messages, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, 200);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, PROFESSOR_PERSONA_PROMPT);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "Tell me something profound.");
}

#[tokio::test]
async fn unknown_voice_uses_default_prompt() {
    let llm = RecordingLlm::replying("Hey you.");
    let (status, response) = send(
        app(llm.clone()),
        submit(r#"{"text": "hello", "voiceId": "unknown-voice"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["sophia_response"], "Hey you.");
    assert_eq!(llm.calls()[0].0[0].content, SOPHIA_PERSONA_PROMPT);
}

#[tokio::test]
async fn persona_overrides_flow_into_the_system_message() {
    let llm = RecordingLlm::replying("ok");
    let personas = PersonaPrompts::from_toml_str(r#"default = "Answer in one word.""#).unwrap();
    let (status, _) = send(
        app_with(llm.clone(), personas),
        submit(r#"{"text": "hello", "voiceId": "someone"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(llm.calls()[0].0[0].content, "Answer in one word.");
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
    let llm = RecordingLlm::failing("API error 429 Too Many Requests: Rate limit reached");
    let (status, body) = send(
        app(llm.clone()),
        submit(r#"{"text": "hi", "voiceId": "x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "Server error: API error 429 Too Many Requests: Rate limit reached"})
    );
    assert!(body.get("sophia_response").is_none());
    assert_eq!(llm.calls().len(), 1);
}

#[tokio::test]
async fn empty_completion_is_a_server_error() {
    let llm = RecordingLlm::empty();
    let (status, body) = send(app(llm), submit(r#"{"text": "hi", "voiceId": "x"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Server error:"));
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/submit")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(RecordingLlm::replying("unused")).oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ORIGIN);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    assert!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("POST")
    );
}

#[tokio::test]
async fn cors_ignores_unlisted_origin() {
    let request = Request::builder()
        .uri("/api/test")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app(RecordingLlm::replying("unused")).oneshot(request).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
