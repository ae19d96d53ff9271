//! AiClient trait implementation for GeminiClient (send_message + streaming).

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiClient, AiError, AiResponse, ChunkHandler, Message, TokenUsage};

use super::client::{
    append_candidate_text, block_reason, empty_answer, error_message, finish_reason, usage_from,
    GeminiClient,
};

#[async_trait]
impl AiClient for GeminiClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(messages);
        let url = self.api_url(false);

        debug!(model = %self.config.model, turns = messages.len(), "Gemini API request");

        let response = self.post(&url, &body).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }

    async fn send_message_streaming(
        &self,
        messages: &[Message],
        on_chunk: ChunkHandler,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(messages);
        let url = format!("{}?alt=sse", self.api_url(true));

        debug!(model = %self.config.model, turns = messages.len(), "Gemini API streaming request");

        let response = self.post(&url, &body).await?;

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();
        let mut blocked: Option<String> = None;
        let mut finished: Option<String> = None;
        let mut events = 0usize;
        let mut fragments = 0usize;

        parse_sse_stream(response, |event: SseEvent| {
            events += 1;
            let data: serde_json::Value = serde_json::from_str(&event.data)
                .map_err(|e| AiError::ParseError(format!("invalid stream event: {e}")))?;

            if let Some(message) = error_message(&data) {
                return Err(AiError::ApiError(message));
            }

            let mut chunk = String::new();
            append_candidate_text(&data, &mut chunk);
            if !chunk.is_empty() {
                fragments += 1;
                full_content.push_str(&chunk);
                on_chunk(chunk);
            }

            if let Some(reason) = block_reason(&data) {
                blocked = Some(reason);
            }
            if let Some(reason) = finish_reason(&data) {
                finished = Some(reason);
            }
            if let Some(u) = usage_from(&data) {
                usage = u;
            }
            Ok(())
        })
        .await?;

        trace!(events, fragments, "Gemini stream drained");

        if events == 0 {
            return Err(AiError::ParseError("empty response stream".to_string()));
        }
        if full_content.is_empty() {
            return Err(empty_answer(blocked, finished));
        }

        Ok(AiResponse {
            content: full_content,
            usage,
        })
    }
}
