//! The ordered intent rule table.
//!
//! Rules are tried top to bottom and the first whose predicate matches
//! answers the question. More specific keyword combinations sit above the
//! broad single-keyword rules that would otherwise swallow them, so the
//! order of [`RULES`] is part of the assistant's behaviour.

use pulse_core::DataSnapshot;

use crate::parser::ParsedQuery;
use crate::response::ResponseGenerator;
use crate::types::{Entity, IntentKind};

const COUNT_TRIGGERS: &[&str] = &["how many", "total", "count"];
const SEARCH_TRIGGERS: &[&str] = &["find", "search", "show me"];
const RECENT_TRIGGERS: &[&str] = &["recent", "latest", "last"];
const COMPANY_TRIGGERS: &[&str] = &["company", "companies"];
const PHONE_TRIGGERS: &[&str] = &["phone", "number"];
const TOP_LEAD_TRIGGERS: &[&str] = &["high score", "top lead", "best lead"];
const SUMMARY_TRIGGERS: &[&str] = &["summary", "overview", "stats", "statistics"];

/// Tests whether a rule applies to a query.
pub type Predicate = fn(&ParsedQuery) -> bool;

/// Produces the answer once a rule has matched.
pub type Handler = fn(&ResponseGenerator, &ParsedQuery, &DataSnapshot) -> String;

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub kind: IntentKind,
    pub matches: Predicate,
    pub respond: Handler,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

/// All rules in priority order.
pub static RULES: [Rule; 10] = [
    Rule {
        kind: IntentKind::Count,
        matches: |q| q.contains_any(COUNT_TRIGGERS) && q.entity.is_some(),
        respond: |gen, q, snap| match q.entity {
            Some(entity) => gen.count(entity, snap),
            None => String::new(),
        },
    },
    Rule {
        kind: IntentKind::StatusBreakdown,
        matches: |q| q.contains("status") && status_entity(q).is_some(),
        respond: |gen, q, snap| match status_entity(q) {
            Some(Entity::Leads) => gen.lead_status_breakdown(snap),
            _ => gen.customer_status_breakdown(snap),
        },
    },
    Rule {
        kind: IntentKind::Search,
        matches: |q| q.contains_any(SEARCH_TRIGGERS),
        respond: |gen, q, snap| gen.search(q.search_phrase.as_deref(), snap),
    },
    Rule {
        kind: IntentKind::Recent,
        matches: |q| q.contains_any(RECENT_TRIGGERS) && q.entity.is_some(),
        respond: |gen, q, snap| match q.entity {
            Some(entity) => gen.recent(entity, snap),
            None => String::new(),
        },
    },
    Rule {
        kind: IntentKind::Companies,
        matches: |q| q.contains_any(COMPANY_TRIGGERS),
        respond: |gen, _, snap| gen.companies(snap),
    },
    Rule {
        kind: IntentKind::EmailLookup,
        matches: |q| q.contains("email") && q.email.is_some(),
        respond: |gen, q, snap| gen.email_lookup(q.email.as_deref().unwrap_or_default(), snap),
    },
    Rule {
        kind: IntentKind::PhoneLookup,
        matches: |q| q.contains_any(PHONE_TRIGGERS) && q.phone.is_some(),
        respond: |gen, q, snap| gen.phone_lookup(q.phone.as_deref().unwrap_or_default(), snap),
    },
    Rule {
        kind: IntentKind::TopLeads,
        matches: |q| q.contains_any(TOP_LEAD_TRIGGERS),
        respond: |gen, _, snap| gen.top_leads(snap),
    },
    Rule {
        kind: IntentKind::ActiveCustomers,
        matches: |q| q.contains("active") && q.contains("customer"),
        respond: |gen, _, snap| gen.active_customers(snap),
    },
    Rule {
        kind: IntentKind::Summary,
        matches: |q| q.contains_any(SUMMARY_TRIGGERS),
        respond: |gen, _, snap| gen.summary(snap),
    },
];

/// First rule matching the query, if any.
pub fn first_match(query: &ParsedQuery) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(query))
}

/// Collection an answer of `kind` is about, when it targets one.
pub fn target_entity(kind: IntentKind, query: &ParsedQuery) -> Option<Entity> {
    match kind {
        IntentKind::Count | IntentKind::Recent => query.entity,
        IntentKind::StatusBreakdown => status_entity(query),
        IntentKind::TopLeads => Some(Entity::Leads),
        IntentKind::ActiveCustomers => Some(Entity::Customers),
        _ => None,
    }
}

/// Status questions are about customers when "customer" appears, otherwise
/// about leads when "lead" appears. Contacts have no status.
fn status_entity(query: &ParsedQuery) -> Option<Entity> {
    if query.contains("customer") {
        Some(Entity::Customers)
    } else if query.contains("lead") {
        Some(Entity::Leads)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
