//! Shared types for the assistant: intents, entities, results, and turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Entity
// =============================================================================

/// One of the three record collections a question can be about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customers,
    Leads,
    Contacts,
}

impl Entity {
    /// Detection order when an utterance names more than one entity.
    pub const ALL: [Entity; 3] = [Entity::Customers, Entity::Leads, Entity::Contacts];

    /// Keyword whose presence in the lower-cased utterance names this entity.
    pub fn keyword(self) -> &'static str {
        match self {
            Entity::Customers => "customer",
            Entity::Leads => "lead",
            Entity::Contacts => "contact",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Entity::Customers => "customers",
            Entity::Leads => "leads",
            Entity::Contacts => "contacts",
        }
    }

    /// Capitalised singular, as used in lookup profiles ("Customer").
    pub fn label(self) -> &'static str {
        match self {
            Entity::Customers => "Customer",
            Entity::Leads => "Lead",
            Entity::Contacts => "Contact",
        }
    }
}

// =============================================================================
// IntentKind
// =============================================================================

/// The question categories the assistant recognises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Count,
    StatusBreakdown,
    Search,
    Recent,
    Companies,
    EmailLookup,
    PhoneLookup,
    TopLeads,
    ActiveCustomers,
    Summary,
    /// Nothing matched; the answer is the help text.
    Unknown,
}

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentKind::Count => "count",
            IntentKind::StatusBreakdown => "status",
            IntentKind::Search => "search",
            IntentKind::Recent => "recent",
            IntentKind::Companies => "companies",
            IntentKind::EmailLookup => "email",
            IntentKind::PhoneLookup => "phone",
            IntentKind::TopLeads => "top_leads",
            IntentKind::ActiveCustomers => "active_customers",
            IntentKind::Summary => "summary",
            IntentKind::Unknown => "unknown",
        }
    }
}

// =============================================================================
// IntentResult
// =============================================================================

/// Outcome of one classify-and-respond call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub kind: IntentKind,
    /// The collection the answer is about, when the intent targets one.
    pub entity: Option<Entity>,
    pub response: String,
}

// =============================================================================
// Conversation turns
// =============================================================================

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAuthor {
    User,
    Assistant,
}

/// A single message in a conversation log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub author: TurnAuthor,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
