//! End-to-end tests of the HTTP surface against a scripted provider.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use parley_ai::{AiClient, AiError, AiResponse, ChunkHandler, ConversationSession, Message, TokenUsage};
use parley_history::{HistoryEntry, HistoryLedger};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::server::router;
use crate::state::AppState;

/// Deterministic provider with a few canned answers; `fail` always errors.
#[derive(Default)]
struct ScriptedClient {
    seen: Mutex<Vec<String>>,
    delay: Duration,
}

impl ScriptedClient {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn answer(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        let question = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.seen.lock().unwrap().push(question.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let content = match question.as_str() {
            "Hello" => "Hi there".to_string(),
            "A" => "a".to_string(),
            "B" => "b".to_string(),
            "fail" => return Err(AiError::ApiError("HTTP 429: quota exhausted".into())),
            "blocked" => {
                return Err(AiError::ApiError(
                    "no answer text (finish reason: SAFETY)".into(),
                ))
            }
            other => format!("answer to {other}"),
        };
        Ok(AiResponse {
            content,
            usage: TokenUsage::default(),
        })
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        self.answer(messages).await
    }

    async fn send_message_streaming(
        &self,
        messages: &[Message],
        on_chunk: ChunkHandler,
    ) -> Result<AiResponse, AiError> {
        let response = self.answer(messages).await?;
        for piece in response.content.split_inclusive(' ') {
            on_chunk(piece.to_string());
        }
        Ok(response)
    }
}

struct Harness {
    app: Router,
    client: Arc<ScriptedClient>,
    session: Arc<ConversationSession>,
    ledger: HistoryLedger,
}

fn harness_with(client: ScriptedClient) -> Harness {
    let client = Arc::new(client);
    let ledger = HistoryLedger::new();
    let session = ConversationSession::new(client.clone());
    let state = AppState::new(session, ledger.clone());
    let session = state.session.clone();
    let app = router(state, true);
    Harness {
        app,
        client,
        session,
        ledger,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedClient::default())
}

impl Harness {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn ask_raw(&self, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/ask")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn ask(&self, question: &str) -> (StatusCode, Value) {
        self.ask_raw(&json!({ "question": question }).to_string())
            .await
    }

    async fn history(&self) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri("/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, index: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/history/{index}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[tokio::test]
async fn ask_then_read_history() {
    let h = harness();

    let (status, body) = h.ask("Hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "input": "Hello", "response": "Hi there" }));

    let (status, body) = h.history().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "history": [{ "input": "Hello", "response": "Hi there" }] })
    );
}

#[tokio::test]
async fn delete_on_empty_history_is_rejected() {
    let h = harness();

    let (status, body) = h.delete("0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Invalid index." }));
    assert!(h.ledger.is_empty().await);
}

#[tokio::test]
async fn delete_first_entry_shifts_the_rest() {
    let h = harness();
    h.ask("A").await;
    h.ask("B").await;

    let (status, body) = h.delete("0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "History entry deleted successfully." })
    );

    let (_, body) = h.history().await;
    assert_eq!(body, json!({ "history": [{ "input": "B", "response": "b" }] }));
}

#[tokio::test]
async fn empty_question_is_rejected_without_calling_provider() {
    let h = harness();

    for question in ["", "   ", "\n\t"] {
        let (status, body) = h.ask(question).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "question {question:?}");
        assert!(body["detail"].is_string());
    }

    assert!(h.ledger.is_empty().await);
    assert!(h.client.seen().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let h = harness();

    for body in ["{}", "not json", r#"{"question": 42}"#] {
        let (status, response) = h.ask_raw(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert!(response["detail"].is_string());
    }

    assert!(h.ledger.is_empty().await);
}

#[tokio::test]
async fn upstream_failure_is_500_and_records_nothing() {
    let h = harness();
    h.ask("A").await;

    let (status, body) = h.ask("fail").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error processing the question:"), "{detail}");
    assert!(detail.contains("quota exhausted"), "{detail}");

    assert_eq!(h.ledger.list().await, vec![HistoryEntry::new("A", "a")]);
}

#[tokio::test]
async fn answer_without_text_is_500_and_not_recorded() {
    let h = harness();
    h.ask("A").await;

    let (status, body) = h.ask("blocked").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("SAFETY"));

    assert_eq!(h.ledger.list().await, vec![HistoryEntry::new("A", "a")]);
    assert_eq!(h.session.turn_count().await, 1);

    let (status, _) = h.ask("B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.ledger.len().await, 2);
}

#[tokio::test]
async fn dropped_request_still_records_its_turn() {
    let h = harness_with(ScriptedClient {
        delay: Duration::from_millis(50),
        ..Default::default()
    });

    let app = h.app.clone();
    let request = tokio::spawn(async move {
        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "question": "A" }).to_string()))
            .unwrap();
        app.oneshot(request).await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    request.abort();

    // The next turn queues behind the detached one.
    let (status, _) = h.ask("B").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(h.session.turn_count().await, 2);
    assert_eq!(
        h.ledger.list().await,
        vec![HistoryEntry::new("A", "a"), HistoryEntry::new("B", "b")]
    );
}

#[tokio::test]
async fn invalid_indices_leave_history_unchanged() {
    let h = harness();
    h.ask("A").await;
    h.ask("B").await;

    for index in ["2", "99", "-1", "abc", "1.5"] {
        let (status, body) = h.delete(index).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "index {index}");
        assert_eq!(body["detail"], "Invalid index.");
    }

    assert_eq!(h.ledger.len().await, 2);
}

#[tokio::test]
async fn delete_middle_entry_reindexes() {
    let h = harness();
    for q in ["q0", "q1", "q2", "q3"] {
        h.ask(q).await;
    }

    let (status, _) = h.delete("1").await;
    assert_eq!(status, StatusCode::OK);

    let inputs: Vec<_> = h
        .ledger
        .list()
        .await
        .into_iter()
        .map(|e| e.input)
        .collect();
    assert_eq!(inputs, vec!["q0", "q2", "q3"]);
}

#[tokio::test]
async fn question_is_recorded_as_submitted() {
    let h = harness();

    let (status, body) = h.ask("  padded  ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["input"], "  padded  ");
    assert_eq!(h.ledger.list().await[0].input, "  padded  ");
}

#[tokio::test]
async fn history_reads_are_idempotent() {
    let h = harness();
    h.ask("A").await;

    let first = h.history().await;
    let second = h.history().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrent_asks_are_all_recorded_in_provider_order() {
    let h = harness_with(ScriptedClient {
        delay: Duration::from_millis(2),
        ..Default::default()
    });
    h.ask("seed").await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = h.app.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/ask")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "question": format!("q{i}") }).to_string()))
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let recorded: Vec<_> = h
        .ledger
        .list()
        .await
        .into_iter()
        .map(|e| e.input)
        .collect();
    assert_eq!(recorded.len(), 21);
    assert_eq!(recorded, h.client.seen());
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness();
    let (status, body) = h
        .send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let h = harness();
    let (status, _) = h
        .send(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
