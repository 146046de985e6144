//! Conversation session log.
//!
//! An append-only, in-memory record of what was said in one chat session.
//! Nothing here is persisted; the log lives as long as the front end keeps it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ChatError;
use crate::types::{ConversationTurn, TurnAuthor};

// =============================================================================
// ConversationSession
// =============================================================================

/// Ordered turns of one conversation.
///
/// Turn timestamps never decrease: system-stamped turns are clamped to the
/// previous turn, caller-stamped turns that would go backwards are refused.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    turns: Vec<ConversationTurn>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Append a turn stamped with the current time.
    pub fn add_turn(&mut self, author: TurnAuthor, text: impl Into<String>) -> &ConversationTurn {
        let now = Utc::now();
        let timestamp = match self.turns.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.push(author, text.into(), timestamp)
    }

    /// Append a turn with a caller-supplied timestamp.
    pub fn add_turn_at(
        &mut self,
        author: TurnAuthor,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<&ConversationTurn, ChatError> {
        if let Some(last) = self.turns.last() {
            if timestamp < last.timestamp {
                return Err(ChatError::NonMonotonicTimestamp {
                    last: last.timestamp,
                    attempted: timestamp,
                });
            }
        }
        Ok(self.push(author, text.into(), timestamp))
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, author: TurnAuthor, text: String, timestamp: DateTime<Utc>) -> &ConversationTurn {
        self.turns.push(ConversationTurn {
            id: Uuid::new_v4(),
            author,
            text,
            timestamp,
        });
        &self.turns[self.turns.len() - 1]
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    // ---- Creation ----

    #[test]
    fn test_new_session_is_empty() {
        let session = ConversationSession::new();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(session.last_turn().is_none());
        assert_ne!(session.id, Uuid::nil());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(ConversationSession::new().id, ConversationSession::new().id);
    }

    // ---- Appending ----

    #[test]
    fn test_add_turn_appends_in_order() {
        let mut session = ConversationSession::new();
        session.add_turn(TurnAuthor::User, "how many leads?");
        session.add_turn(TurnAuthor::Assistant, "You have 0 leads in total.");

        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].author, TurnAuthor::User);
        assert_eq!(turns[0].text, "how many leads?");
        assert_eq!(turns[1].author, TurnAuthor::Assistant);
        assert!(turns[0].timestamp <= turns[1].timestamp);
        assert_ne!(turns[0].id, turns[1].id);
    }

    #[test]
    fn test_add_turn_keeps_duplicates() {
        let mut session = ConversationSession::new();
        session.add_turn(TurnAuthor::User, "stats");
        session.add_turn(TurnAuthor::User, "stats");
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_add_turn_clamps_to_previous_timestamp() {
        let mut session = ConversationSession::new();
        let future = Utc::now() + Duration::hours(1);
        session.add_turn_at(TurnAuthor::User, "hi", future).unwrap();
        let turn = session.add_turn(TurnAuthor::Assistant, "hello");
        assert_eq!(turn.timestamp, future);
    }

    #[test]
    fn test_add_turn_at_accepts_equal_and_later() {
        let mut session = ConversationSession::new();
        session.add_turn_at(TurnAuthor::User, "a", at(9, 0)).unwrap();
        session.add_turn_at(TurnAuthor::Assistant, "b", at(9, 0)).unwrap();
        let turn = session.add_turn_at(TurnAuthor::User, "c", at(9, 5)).unwrap();
        assert_eq!(turn.timestamp, at(9, 5));
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_add_turn_at_rejects_earlier() {
        let mut session = ConversationSession::new();
        session.add_turn_at(TurnAuthor::User, "a", at(10, 0)).unwrap();
        let err = session
            .add_turn_at(TurnAuthor::Assistant, "b", at(9, 59))
            .unwrap_err();
        assert!(matches!(err, ChatError::NonMonotonicTimestamp { .. }));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_session_serializes_turns() {
        let mut session = ConversationSession::new();
        session.add_turn_at(TurnAuthor::User, "stats", at(8, 0)).unwrap();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["turns"][0]["author"], "user");
        assert_eq!(json["turns"][0]["text"], "stats");
    }
}
