//! Session state and the turn guard.

use tokio::sync::MutexGuard;

use crate::{Message, TokenUsage};

use super::manager::ConversationSession;

/// Dialogue accumulated with the provider. Only completed turns are recorded.
#[derive(Debug, Default)]
pub(crate) struct Transcript {
    pub(crate) messages: Vec<Message>,
    pub(crate) usage: TokenUsage,
    pub(crate) turns: u64,
}

/// Exclusive access to the conversation for one or more turns.
///
/// Obtained from [`ConversationSession::begin_turn`]. Waiters are queued in
/// FIFO order, so turns reach the provider in the order they were requested.
/// Work done while the guard is alive (such as recording the exchange
/// elsewhere) is ordered the same way.
pub struct SessionTurn<'a> {
    pub(super) session: &'a ConversationSession,
    pub(super) transcript: MutexGuard<'a, Transcript>,
}
