//! Gemini API client struct, request building, and response parsing.

use std::time::Duration;

use crate::{AiError, AiResponse, Message, Role, TokenUsage};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!("{}/models/{}:{}", self.config.api_base, self.config.model, method)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let mut contents = Vec::new();

        for msg in messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
                Role::System => continue, // handled via systemInstruction
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content }]
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if let Some(system) = messages.iter().find(|m| m.role == Role::System) {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.content }]
            });
        }

        body
    }

    /// POST `body` and map non-success statuses to errors.
    pub(crate) async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AiError> {
        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        Ok(response)
    }

    /// Parse a complete (non-streamed) Gemini response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        if let Some(message) = error_message(&json) {
            return Err(AiError::ApiError(message));
        }

        let candidates = json["candidates"].as_array();
        if candidates.map_or(true, |c| c.is_empty()) {
            if let Some(reason) = block_reason(&json) {
                return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
            }
            return Err(AiError::ParseError("no candidates in response".to_string()));
        }

        let mut content = String::new();
        append_candidate_text(&json, &mut content);
        if content.is_empty() {
            return Err(empty_answer(block_reason(&json), finish_reason(&json)));
        }

        Ok(AiResponse {
            content,
            usage: usage_from(&json).unwrap_or_default(),
        })
    }
}

/// Append the text parts of the first candidate to `out`.
pub(crate) fn append_candidate_text(json: &serde_json::Value, out: &mut String) {
    let Some(parts) = json["candidates"][0]["content"]["parts"].as_array() else {
        return;
    };
    for part in parts {
        if let Some(text) = part["text"].as_str() {
            out.push_str(text);
        }
    }
}

pub(crate) fn usage_from(json: &serde_json::Value) -> Option<TokenUsage> {
    let meta = json.get("usageMetadata")?;
    Some(TokenUsage {
        input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0),
    })
}

pub(crate) fn block_reason(json: &serde_json::Value) -> Option<String> {
    json["promptFeedback"]["blockReason"]
        .as_str()
        .map(str::to_string)
}

pub(crate) fn finish_reason(json: &serde_json::Value) -> Option<String> {
    json["candidates"][0]["finishReason"]
        .as_str()
        .map(str::to_string)
}

/// A response that ended without any answer text.
pub(crate) fn empty_answer(block: Option<String>, finish: Option<String>) -> AiError {
    match (block, finish) {
        (Some(reason), _) => AiError::ApiError(format!("prompt blocked: {reason}")),
        (None, Some(reason)) => {
            AiError::ApiError(format!("no answer text (finish reason: {reason})"))
        }
        (None, None) => AiError::ApiError("no answer text in response".to_string()),
    }
}

/// Error objects can arrive inside a 200 stream as well as in error bodies.
pub(crate) fn error_message(json: &serde_json::Value) -> Option<String> {
    let error = json.get("error")?;
    let message = error["message"].as_str().unwrap_or("unknown error");
    Some(match error["code"].as_u64() {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    })
}
