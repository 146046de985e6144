//! Utterance parsing.
//!
//! Lower-cases the raw text once and pulls out everything the intent rules
//! look at: the named entity, a search phrase, an email address, and a
//! phone number.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Entity;

// =============================================================================
// Compiled regexes (compiled once, reused across calls)
// =============================================================================

static SEARCH_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:find|search|show me)\s+(.+?)(?:\s+in|\s+from|$)")
        .expect("Invalid search phrase regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("Invalid email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9][0-9\s\-()]+").expect("Invalid phone regex"));

// =============================================================================
// ParsedQuery
// =============================================================================

/// An utterance prepared for rule matching.
///
/// Every extraction runs on the lower-cased text, so extracted phrases and
/// addresses are lower-case too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Text exactly as the user typed it.
    pub raw: String,
    /// Lower-cased text used for all matching.
    pub lower: String,
    /// First entity keyword present, checked customer, lead, contact.
    pub entity: Option<Entity>,
    /// Trimmed phrase following "find", "search" or "show me".
    pub search_phrase: Option<String>,
    /// First email-looking token.
    pub email: Option<String>,
    /// First phone-looking run, trimmed, as typed.
    pub phone: Option<String>,
}

impl ParsedQuery {
    /// Substring test against the lower-cased utterance.
    pub fn contains(&self, keyword: &str) -> bool {
        self.lower.contains(keyword)
    }

    /// True when any of `keywords` occurs in the lower-cased utterance.
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.lower.contains(k))
    }
}

// =============================================================================
// QueryParser
// =============================================================================

/// Rule-independent utterance parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw utterance into a [`ParsedQuery`].
    pub fn parse(&self, raw: &str) -> ParsedQuery {
        let lower = raw.to_lowercase();

        ParsedQuery {
            entity: self.extract_entity(&lower),
            search_phrase: self.extract_search_phrase(&lower),
            email: self.extract_email(&lower),
            phone: self.extract_phone(&lower),
            raw: raw.to_string(),
            lower,
        }
    }

    /// First entity whose keyword appears in the text.
    pub fn extract_entity(&self, lower: &str) -> Option<Entity> {
        Entity::ALL
            .into_iter()
            .find(|entity| lower.contains(entity.keyword()))
    }

    /// Phrase after a search trigger, up to " in", " from", or the end.
    pub fn extract_search_phrase(&self, text: &str) -> Option<String> {
        SEARCH_PHRASE_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        EMAIL_RE.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Strip spaces, hyphens, and parentheses so formatted numbers compare by digits.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
