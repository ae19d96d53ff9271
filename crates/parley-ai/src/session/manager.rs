//! ConversationSession struct and conversation management.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{AiClient, AiError, Message, TokenUsage};

use super::types::{SessionTurn, Transcript};

/// Default bound on a single provider call.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(60);

/// The single long-lived dialogue with the model provider.
///
/// Turns are serialized: concurrent callers wait in a FIFO queue and the
/// provider sees every question exactly once, in queue order.
pub struct ConversationSession {
    /// Provider client.
    pub(super) client: Arc<dyn AiClient>,
    /// Completed turns, guarded by the turn lock.
    pub(super) transcript: Mutex<Transcript>,
    /// System instruction sent ahead of every turn.
    pub(super) system_prompt: Option<String>,
    /// Whether to use the provider's streaming endpoint.
    pub(super) streaming: bool,
    /// Upper bound on a single provider call.
    pub(super) turn_timeout: Duration,
}

impl ConversationSession {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client,
            transcript: Mutex::new(Transcript::default()),
            system_prompt: None,
            streaming: true,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Wait for exclusive access to the conversation.
    pub async fn begin_turn(&self) -> SessionTurn<'_> {
        SessionTurn {
            session: self,
            transcript: self.transcript.lock().await,
        }
    }

    /// Send `question` as the next turn and return the complete answer.
    pub async fn ask(&self, question: &str) -> Result<String, AiError> {
        self.begin_turn().await.ask(question).await
    }

    /// Snapshot of the completed turns, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        self.transcript.lock().await.messages.clone()
    }

    /// Number of completed turns.
    pub async fn turn_count(&self) -> u64 {
        self.transcript.lock().await.turns
    }

    /// Cumulative token usage reported by the provider.
    pub async fn usage(&self) -> TokenUsage {
        self.transcript.lock().await.usage.clone()
    }

    pub(super) fn build_messages(&self, transcript: &Transcript, question: &str) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(transcript.messages.len() + 2);
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message::system(system.clone()));
        }
        msgs.extend(transcript.messages.iter().cloned());
        msgs.push(Message::user(question));
        msgs
    }
}
