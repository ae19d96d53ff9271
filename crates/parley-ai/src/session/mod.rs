//! Conversation session management.
//!
//! A `ConversationSession` holds the dialogue transcript and serializes
//! turns so the provider observes them in a single well-defined order.

mod chat;
mod manager;
mod types;


pub use manager::{ConversationSession, DEFAULT_TURN_TIMEOUT};
pub use types::SessionTurn;
