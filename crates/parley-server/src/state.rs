//! Shared state handed to every request handler.

use std::sync::Arc;

use parley_ai::ConversationSession;
use parley_history::HistoryLedger;

/// Created once at startup and dropped at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ConversationSession>,
    pub ledger: HistoryLedger,
}

impl AppState {
    pub fn new(session: ConversationSession, ledger: HistoryLedger) -> Self {
        Self {
            session: Arc::new(session),
            ledger,
        }
    }
}
