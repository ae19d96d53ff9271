use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use parley_ai::AiError;
use parley_history::HistoryEntry;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, INVALID_INDEX};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `POST /ask`: run one turn and record the exchange.
pub async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let Json(AskRequest { question }) =
        payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    if question.trim().is_empty() {
        return Err(ApiError::Validation(
            "Question must not be empty.".to_string(),
        ));
    }

    // Runs detached so a dropped connection cannot split a turn between the
    // transcript and the ledger. The turn stays held until the exchange is
    // recorded, so ledger order matches the order the provider saw.
    let (index, entry) = tokio::spawn(async move {
        let mut turn = state.session.begin_turn().await;
        let answer = turn.ask(&question).await?;
        let entry = HistoryEntry::new(question, answer);
        let index = state.ledger.append(entry.clone()).await;
        Ok::<_, AiError>((index, entry))
    })
    .await
    .map_err(upstream)?
    .map_err(upstream)?;

    tracing::info!(index, "Question answered");
    Ok(Json(entry))
}

fn upstream(err: impl std::fmt::Display) -> ApiError {
    ApiError::Upstream(format!("Error processing the question: {err}"))
}

/// `GET /history`
pub async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.ledger.list().await,
    })
}

/// `DELETE /history/{index}`
pub async fn delete_history_handler(
    State(state): State<AppState>,
    Path(raw_index): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let index: usize = raw_index
        .parse()
        .map_err(|_| ApiError::Validation(INVALID_INDEX.to_string()))?;

    state.ledger.delete_at(index).await?;

    tracing::info!(index, "History entry deleted");
    Ok(Json(MessageResponse {
        message: "History entry deleted successfully.".to_string(),
    }))
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
