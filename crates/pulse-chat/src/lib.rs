//! Rule-based CRM assistant for Customer Pulse.
//!
//! Answers natural-language questions about a user's customers, leads, and
//! contacts from an in-memory [`DataSnapshot`], and keeps a simple
//! conversation log for the front end to render.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod response;
pub mod rules;
pub mod types;

use pulse_core::DataSnapshot;

pub use context::ConversationSession;
pub use error::ChatError;
pub use orchestrator::Assistant;
pub use parser::{ParsedQuery, QueryParser};
pub use response::{ResponseGenerator, HELP_TEXT};
pub use rules::{Rule, RULES};
pub use types::{ConversationTurn, Entity, IntentKind, IntentResult, TurnAuthor};

/// Answer `utterance` from `snapshot` with the default configuration.
///
/// Pure and total: the same inputs always give the same non-empty answer.
pub fn respond(utterance: &str, snapshot: &DataSnapshot) -> String {
    Assistant::default().respond(utterance, snapshot)
}
