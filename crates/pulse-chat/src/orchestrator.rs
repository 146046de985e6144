//! Assistant: central coordinator wiring parser, rules, and responses.
//!
//! Answers questions against a snapshot and records exchanges in a
//! [`ConversationSession`].

use pulse_core::config::AssistantConfig;
use pulse_core::DataSnapshot;
use tracing::debug;

use crate::context::ConversationSession;
use crate::error::ChatError;
use crate::parser::QueryParser;
use crate::response::{ResponseGenerator, HELP_TEXT};
use crate::rules::{self, Rule, RULES};
use crate::types::{IntentKind, IntentResult, TurnAuthor};

/// Rule-based CRM assistant.
///
/// Holds no per-conversation state, so one instance can serve any number of
/// sessions concurrently.
#[derive(Debug, Clone)]
pub struct Assistant {
    parser: QueryParser,
    response_generator: ResponseGenerator,
    config: AssistantConfig,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}

impl Assistant {
    /// Create an assistant with the given configuration.
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            parser: QueryParser::new(),
            response_generator: ResponseGenerator::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// The intent rules in the order they are tried.
    pub fn rules(&self) -> &'static [Rule] {
        &RULES
    }

    /// Which intent an utterance resolves to, without composing an answer.
    pub fn classify(&self, utterance: &str) -> IntentKind {
        let query = self.parser.parse(utterance);
        rules::first_match(&query).map_or(IntentKind::Unknown, |rule| rule.kind)
    }

    /// Classify an utterance and answer it from `snapshot`.
    pub fn analyze(&self, utterance: &str, snapshot: &DataSnapshot) -> IntentResult {
        let query = self.parser.parse(utterance);

        match rules::first_match(&query) {
            Some(rule) => {
                debug!(intent = rule.kind.as_str(), "Utterance matched intent rule");
                let response = (rule.respond)(&self.response_generator, &query, snapshot);
                // Answers are never empty.
                let response = if response.is_empty() {
                    HELP_TEXT.to_string()
                } else {
                    response
                };
                IntentResult {
                    kind: rule.kind,
                    entity: rules::target_entity(rule.kind, &query),
                    response,
                }
            }
            None => {
                debug!("No intent rule matched; answering with help text");
                IntentResult {
                    kind: IntentKind::Unknown,
                    entity: None,
                    response: HELP_TEXT.to_string(),
                }
            }
        }
    }

    /// Answer an utterance. Always returns a non-empty string.
    pub fn respond(&self, utterance: &str, snapshot: &DataSnapshot) -> String {
        self.analyze(utterance, snapshot).response
    }

    /// Start a session whose first turn is the assistant's greeting.
    pub fn open_session(&self) -> ConversationSession {
        let mut session = ConversationSession::new();
        session.add_turn(TurnAuthor::Assistant, self.config.greeting.clone());
        session
    }

    /// Answer a user message and record both sides in `session`.
    ///
    /// Blank and over-long messages are refused without touching the log.
    pub fn handle_message(
        &self,
        session: &mut ConversationSession,
        message: &str,
        snapshot: &DataSnapshot,
    ) -> Result<IntentResult, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let result = self.analyze(message, snapshot);
        session.add_turn(TurnAuthor::User, message);
        session.add_turn(TurnAuthor::Assistant, result.response.clone());

        debug!(
            session_id = %session.id,
            turns = session.len(),
            intent = result.kind.as_str(),
            "Message handled"
        );
        Ok(result)
    }
}

// =============================================================================
// Tests
// =============================================================================
