//! Running a single turn against the provider.

use tracing::{debug, trace};

use crate::{AiError, Message};

use super::types::SessionTurn;

impl SessionTurn<'_> {
    /// Send `question` as the next turn and return the complete answer.
    ///
    /// Streamed fragments are drained and joined before returning. On any
    /// failure the transcript is left exactly as it was.
    pub async fn ask(&mut self, question: &str) -> Result<String, AiError> {
        let session = self.session;
        let messages = session.build_messages(&self.transcript, question);
        let client = session.client.as_ref();

        let call = async {
            if session.streaming {
                client
                    .send_message_streaming(
                        &messages,
                        Box::new(|chunk: String| trace!(len = chunk.len(), "fragment received")),
                    )
                    .await
            } else {
                client.send_message(&messages).await
            }
        };

        let response = tokio::time::timeout(session.turn_timeout, call)
            .await
            .map_err(|_| AiError::Timeout(session.turn_timeout.as_secs()))??;

        let transcript = &mut *self.transcript;
        transcript.messages.push(Message::user(question));
        transcript
            .messages
            .push(Message::assistant(response.content.clone()));
        transcript.usage.add(&response.usage);
        transcript.turns += 1;

        debug!(
            turn = transcript.turns,
            tokens = response.usage.total_tokens(),
            total_tokens = transcript.usage.total_tokens(),
            "Turn completed"
        );

        Ok(response.content)
    }
}
