//! Response formatting for each intent.
//!
//! Every answer is composed from the snapshot alone; nothing here reads the
//! clock, the locale, or any outside state.

use indexmap::IndexMap;
use pulse_core::config::AssistantConfig;
use pulse_core::{CrmRecord, CustomerStatus, DataSnapshot, LeadRecord, LeadStatus};

use crate::parser::normalize_phone;
use crate::types::Entity;

/// Answer for utterances no rule recognises.
pub const HELP_TEXT: &str = "I can help you with:\n\n\
📊 Counts: \"How many customers do I have?\"\n\
📈 Status: \"What's the status of my leads?\"\n\
🔍 Search: \"Find John Smith\"\n\
⏰ Recent: \"Show me recent customers\"\n\
🏢 Companies: \"What companies do I work with?\"\n\
📧 Email lookup: \"Who has email john@example.com?\"\n\
📞 Phone lookup: \"Find phone number 555-1234\"\n\
⭐ Top leads: \"Show me high score leads\"\n\
📋 Overview: \"Give me a summary\"\n\n\
What would you like to know?";

const NO_COMPANY: &str = "No company";
const NOT_AVAILABLE: &str = "N/A";
const MISSING_STATUS: &str = "unspecified";

// =============================================================================
// ResponseGenerator
// =============================================================================

/// Formats intent answers from a snapshot.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    /// Records listed by "recent" answers.
    pub recent_limit: usize,
    /// Leads listed by the "top leads" answer.
    pub top_leads_limit: usize,
    /// Names or companies listed before the list is cut with "...".
    pub list_limit: usize,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

impl ResponseGenerator {
    pub fn new(recent_limit: usize, top_leads_limit: usize, list_limit: usize) -> Self {
        Self {
            recent_limit,
            top_leads_limit,
            list_limit,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.recent_limit,
            config.top_leads_limit,
            config.list_limit,
        )
    }

    // -----------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------

    pub fn count(&self, entity: Entity, snapshot: &DataSnapshot) -> String {
        let n = match entity {
            Entity::Customers => snapshot.customers.len(),
            Entity::Leads => snapshot.leads.len(),
            Entity::Contacts => snapshot.contacts.len(),
        };
        format!("You have {} {} in total.", n, entity.plural())
    }

    /// Customer status counts in first-seen order. Customers without a
    /// status form their own group.
    pub fn customer_status_breakdown(&self, snapshot: &DataSnapshot) -> String {
        let statuses = snapshot
            .customers
            .iter()
            .map(|c| c.status.as_ref().map(CustomerStatus::as_str));
        status_breakdown(Entity::Customers, statuses)
    }

    /// Lead status counts in first-seen order.
    pub fn lead_status_breakdown(&self, snapshot: &DataSnapshot) -> String {
        let statuses = snapshot
            .leads
            .iter()
            .map(|l| l.status.as_ref().map(LeadStatus::as_str));
        status_breakdown(Entity::Leads, statuses)
    }

    pub fn companies(&self, snapshot: &DataSnapshot) -> String {
        let companies = snapshot.distinct_companies(true);
        if companies.is_empty() {
            return "No company information available yet.".to_string();
        }
        format!(
            "You have contacts from {} different companies: {}",
            companies.len(),
            self.capped_list(&companies)
        )
    }

    pub fn active_customers(&self, snapshot: &DataSnapshot) -> String {
        let active: Vec<&str> = snapshot
            .customers
            .iter()
            .filter(|c| c.status == Some(CustomerStatus::Active))
            .map(|c| c.name.as_str())
            .collect();

        if active.is_empty() {
            return "You have no active customers yet.".to_string();
        }
        format!(
            "You have {} active customers: {}",
            active.len(),
            self.capped_list(&active)
        )
    }

    pub fn summary(&self, snapshot: &DataSnapshot) -> String {
        let active = snapshot
            .customers
            .iter()
            .filter(|c| c.status == Some(CustomerStatus::Active))
            .count();
        let new_leads = count_leads_with(&snapshot.leads, LeadStatus::New);
        let qualified = count_leads_with(&snapshot.leads, LeadStatus::Qualified);
        let companies = snapshot.distinct_companies(false).len();

        format!(
            "Here's your CRM summary:\n\
             • Total Customers: {} ({} active)\n\
             • Total Leads: {} ({} new, {} qualified)\n\
             • Total Contacts: {}\n\
             • Companies: {} unique companies",
            snapshot.customers.len(),
            active,
            snapshot.leads.len(),
            new_leads,
            qualified,
            snapshot.contacts.len(),
            companies
        )
    }

    // -----------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------

    /// Case-insensitive name search across all three collections.
    ///
    /// `phrase` is `None` when the utterance had no text after the trigger.
    pub fn search(&self, phrase: Option<&str>, snapshot: &DataSnapshot) -> String {
        let phrase = phrase.unwrap_or_default();
        if phrase.is_empty() {
            return no_results(phrase);
        }
        let needle = phrase.to_lowercase();

        let customers = name_matches(&snapshot.customers, &needle);
        let leads = name_matches(&snapshot.leads, &needle);
        let contacts = name_matches(&snapshot.contacts, &needle);

        let mut clauses = Vec::new();
        if !customers.is_empty() {
            clauses.push(format!(
                "Found {} customer(s): {}.",
                customers.len(),
                join(customers.iter().map(|c| name_with_company(*c)))
            ));
        }
        if !leads.is_empty() {
            clauses.push(format!(
                "Found {} lead(s): {}.",
                leads.len(),
                join(leads.iter().map(|l| {
                    format!(
                        "{} - {} ({})",
                        l.name,
                        lead_status(l),
                        l.company().unwrap_or(NO_COMPANY)
                    )
                }))
            ));
        }
        if !contacts.is_empty() {
            clauses.push(format!(
                "Found {} contact(s): {}.",
                contacts.len(),
                join(contacts.iter().map(|c| name_with_company(*c)))
            ));
        }

        if clauses.is_empty() {
            no_results(phrase)
        } else {
            clauses.join(" ")
        }
    }

    /// The first records of a collection in snapshot order.
    pub fn recent(&self, entity: Entity, snapshot: &DataSnapshot) -> String {
        let items: Vec<String> = match entity {
            Entity::Customers => snapshot
                .customers
                .iter()
                .take(self.recent_limit)
                .map(name_with_company)
                .collect(),
            Entity::Leads => snapshot
                .leads
                .iter()
                .take(self.recent_limit)
                .map(|l| format!("{} - {}", l.name, lead_status(l)))
                .collect(),
            Entity::Contacts => snapshot
                .contacts
                .iter()
                .take(self.recent_limit)
                .map(name_with_company)
                .collect(),
        };

        if items.is_empty() {
            return format!("You have no {} yet.", entity.plural());
        }
        format!(
            "Your most recent {} are: {}",
            entity.plural(),
            items.join(", ")
        )
    }

    /// Scored leads, highest first. Equal scores keep snapshot order.
    pub fn top_leads(&self, snapshot: &DataSnapshot) -> String {
        let mut scored: Vec<(&LeadRecord, u32)> = snapshot
            .leads
            .iter()
            .filter_map(|l| l.score.map(|s| (l, s)))
            .collect();

        if scored.is_empty() {
            return "No leads with scores available.".to_string();
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        let listed = join(
            scored
                .iter()
                .take(self.top_leads_limit)
                .map(|(l, score)| format!("{} (Score: {}, Status: {})", l.name, score, lead_status(l))),
        );
        format!("Your top scoring leads are: {}", listed)
    }

    // -----------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------

    /// Exact email match, customers first, then leads, then contacts.
    pub fn email_lookup(&self, email: &str, snapshot: &DataSnapshot) -> String {
        if let Some(c) = snapshot.customers.iter().find(|c| c.email() == email) {
            return format!(
                "{} (Customer) - Company: {}, Phone: {}, Status: {}",
                c.name,
                c.company().unwrap_or(NOT_AVAILABLE),
                c.phone().unwrap_or(NOT_AVAILABLE),
                c.status
                    .as_ref()
                    .map_or(MISSING_STATUS, CustomerStatus::as_str)
            );
        }
        if let Some(l) = snapshot.leads.iter().find(|l| l.email() == email) {
            return format!(
                "{} (Lead) - Company: {}, Status: {}, Phone: {}, Score: {}",
                l.name,
                l.company().unwrap_or(NOT_AVAILABLE),
                lead_status(l),
                l.phone().unwrap_or(NOT_AVAILABLE),
                l.score
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string())
            );
        }
        if let Some(c) = snapshot.contacts.iter().find(|c| c.email() == email) {
            return format!(
                "{} (Contact) - Company: {}, Title: {}, Phone: {}",
                c.name,
                c.company().unwrap_or(NOT_AVAILABLE),
                c.title().unwrap_or(NOT_AVAILABLE),
                c.phone().unwrap_or(NOT_AVAILABLE)
            );
        }
        not_found(email)
    }

    /// Digits-only containment match, customers first, then leads, then
    /// contacts. `phone` is reported back verbatim when nothing matches.
    pub fn phone_lookup(&self, phone: &str, snapshot: &DataSnapshot) -> String {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return not_found(phone);
        }
        let has_number = |stored: Option<&str>| {
            stored.is_some_and(|p| normalize_phone(p).contains(&digits))
        };

        if let Some(c) = snapshot.customers.iter().find(|c| has_number(c.phone())) {
            return format!(
                "{} (Customer) - Company: {}, Email: {}",
                c.name,
                c.company().unwrap_or(NOT_AVAILABLE),
                c.email
            );
        }
        if let Some(l) = snapshot.leads.iter().find(|l| has_number(l.phone())) {
            return format!(
                "{} (Lead) - Company: {}, Email: {}, Status: {}",
                l.name,
                l.company().unwrap_or(NOT_AVAILABLE),
                l.email,
                lead_status(l)
            );
        }
        if let Some(c) = snapshot.contacts.iter().find(|c| has_number(c.phone())) {
            return format!(
                "{} (Contact) - Company: {}, Email: {}",
                c.name,
                c.company().unwrap_or(NOT_AVAILABLE),
                c.email
            );
        }
        not_found(phone)
    }

    // -- Private helpers --

    fn capped_list(&self, items: &[&str]) -> String {
        let shown = items
            .iter()
            .take(self.list_limit)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if items.len() > self.list_limit {
            format!("{}...", shown)
        } else {
            shown
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn status_breakdown<'a>(entity: Entity, statuses: impl Iterator<Item = Option<&'a str>>) -> String {
    let mut counts: IndexMap<Option<&str>, usize> = IndexMap::new();
    for status in statuses {
        *counts.entry(status).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return format!("You have no {} yet.", entity.plural());
    }

    let breakdown = counts
        .iter()
        .map(|(status, n)| format!("{}: {}", status.unwrap_or(MISSING_STATUS), n))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} status breakdown: {}", entity.label(), breakdown)
}

fn name_matches<'a, R: CrmRecord>(records: &'a [R], needle: &str) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| r.name().to_lowercase().contains(needle))
        .collect()
}

fn name_with_company<R: CrmRecord>(record: &R) -> String {
    format!(
        "{} ({})",
        record.name(),
        record.company().unwrap_or(NO_COMPANY)
    )
}

fn lead_status(lead: &LeadRecord) -> &str {
    lead.status.as_ref().map_or(MISSING_STATUS, LeadStatus::as_str)
}

fn count_leads_with(leads: &[LeadRecord], status: LeadStatus) -> usize {
    leads
        .iter()
        .filter(|l| l.status.as_ref() == Some(&status))
        .count()
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn no_results(phrase: &str) -> String {
    format!("No results found for \"{}\".", phrase)
}

fn not_found(what: &str) -> String {
    format!("No records found for {}.", what)
}

// =============================================================================
// Tests
// =============================================================================
