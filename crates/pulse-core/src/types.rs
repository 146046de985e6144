use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::error::{PulseError, Result};

// =============================================================================
// Identifiers
// =============================================================================

/// Record identifier as handed out by the backend.
///
/// The hosted backend uses UUID strings while the bundled demo data uses
/// integers; both are kept as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s),
        })
    }
}

// =============================================================================
// Status enums
// =============================================================================

/// Lifecycle status of a customer.
///
/// Values outside the known set are kept verbatim in `Other` so that
/// grouping and display never lose information.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Pending,
    Other(String),
}

impl CustomerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Pending => "pending",
            CustomerStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CustomerStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => CustomerStatus::Active,
            "inactive" => CustomerStatus::Inactive,
            "pending" => CustomerStatus::Pending,
            _ => CustomerStatus::Other(raw),
        }
    }
}

impl From<&str> for CustomerStatus {
    fn from(raw: &str) -> Self {
        CustomerStatus::from(raw.to_string())
    }
}

impl From<CustomerStatus> for String {
    fn from(status: CustomerStatus) -> Self {
        match status {
            CustomerStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage of a lead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
    Other(String),
}

impl LeadStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
            LeadStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for LeadStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "new" => LeadStatus::New,
            "contacted" => LeadStatus::Contacted,
            "qualified" => LeadStatus::Qualified,
            "proposal" => LeadStatus::Proposal,
            "won" => LeadStatus::Won,
            "lost" => LeadStatus::Lost,
            _ => LeadStatus::Other(raw),
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(raw: &str) -> Self {
        LeadStatus::from(raw.to_string())
    }
}

impl From<LeadStatus> for String {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Records
// =============================================================================

/// Fields every CRM record shares.
///
/// Optional text fields treat an empty string the same as a missing value.
pub trait CrmRecord {
    fn id(&self) -> &RecordId;
    fn name(&self) -> &str;
    fn email(&self) -> &str;
    fn phone(&self) -> Option<&str>;
    fn company(&self) -> Option<&str>;
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A paying (or formerly paying) customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A prospective customer moving through the sales pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Acquisition channel: website, referral, social-media, ...
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// Qualification score, 0 to 100.
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A person in the address book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContactRecord {
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }
}

macro_rules! impl_crm_record {
    ($($record:ty),+) => {
        $(
            impl CrmRecord for $record {
                fn id(&self) -> &RecordId {
                    &self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }

                fn email(&self) -> &str {
                    &self.email
                }

                fn phone(&self) -> Option<&str> {
                    non_empty(&self.phone)
                }

                fn company(&self) -> Option<&str> {
                    non_empty(&self.company)
                }

                fn created_at(&self) -> Option<DateTime<Utc>> {
                    self.created_at
                }
            }
        )+
    };
}

impl_crm_record!(CustomerRecord, LeadRecord, ContactRecord);

// =============================================================================
// DataSnapshot
// =============================================================================

/// Point-in-time copy of one user's customers, leads and contacts.
///
/// Built by whatever fetches the data and handed to the assistant read-only.
/// Collection order is the caller's order; nothing in here re-sorts unless
/// [`DataSnapshot::newest_first`] is asked for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    pub customers: Vec<CustomerRecord>,
    pub leads: Vec<LeadRecord>,
    pub contacts: Vec<ContactRecord>,
}

impl DataSnapshot {
    pub fn new(
        customers: Vec<CustomerRecord>,
        leads: Vec<LeadRecord>,
        contacts: Vec<ContactRecord>,
    ) -> Self {
        Self {
            customers,
            leads,
            contacts,
        }
    }

    /// Parse a snapshot from its JSON form. Missing collections are empty.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&content)?;
        info!(
            customers = snapshot.customers.len(),
            leads = snapshot.leads.len(),
            contacts = snapshot.contacts.len(),
            "Snapshot loaded from {}",
            path.display()
        );
        Ok(snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.leads.is_empty() && self.contacts.is_empty()
    }

    /// Check the record invariants: unique ids per collection and lead
    /// scores within 0..=100. Reports the first violation found.
    pub fn validate(&self) -> Result<()> {
        check_unique_ids("customer", &self.customers)?;
        check_unique_ids("lead", &self.leads)?;
        check_unique_ids("contact", &self.contacts)?;

        if let Some(lead) = self.leads.iter().find(|l| l.score.is_some_and(|s| s > 100)) {
            return Err(PulseError::InvalidSnapshot(format!(
                "lead {} has score {} outside 0..=100",
                lead.id,
                lead.score.unwrap_or_default()
            )));
        }

        Ok(())
    }

    /// Reorder every collection by creation time, newest first.
    ///
    /// Records without a timestamp go last; ties keep their input order.
    pub fn newest_first(mut self) -> Self {
        self.customers.sort_by_key(|r| Reverse(r.created_at()));
        self.leads.sort_by_key(|r| Reverse(r.created_at()));
        self.contacts.sort_by_key(|r| Reverse(r.created_at()));
        self
    }

    /// Distinct non-empty company names in first-seen order, scanning
    /// customers, then leads, then (optionally) contacts.
    pub fn distinct_companies(&self, include_contacts: bool) -> Vec<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        seen.extend(self.customers.iter().filter_map(CrmRecord::company));
        seen.extend(self.leads.iter().filter_map(CrmRecord::company));
        if include_contacts {
            seen.extend(self.contacts.iter().filter_map(CrmRecord::company));
        }
        seen.into_iter().collect()
    }
}

fn check_unique_ids<R: CrmRecord>(kind: &str, records: &[R]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(PulseError::InvalidSnapshot(format!(
                "duplicate {} id {}",
                kind,
                record.id()
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn customer(id: u64, name: &str, company: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            id: RecordId::from(id),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            company: company.map(str::to_string),
            status: Some(CustomerStatus::Active),
            created_at: None,
        }
    }

    fn lead(id: u64, name: &str, score: Option<u32>) -> LeadRecord {
        LeadRecord {
            id: RecordId::from(id),
            name: name.to_string(),
            email: String::new(),
            phone: None,
            company: None,
            source: None,
            status: Some(LeadStatus::New),
            score,
            created_at: None,
        }
    }

    // ---- Status enums ----

    #[test]
    fn test_customer_status_known_values() {
        assert_eq!(CustomerStatus::from("active"), CustomerStatus::Active);
        assert_eq!(CustomerStatus::from("inactive"), CustomerStatus::Inactive);
        assert_eq!(CustomerStatus::from("pending"), CustomerStatus::Pending);
    }

    #[test]
    fn test_customer_status_unknown_kept_verbatim() {
        let status = CustomerStatus::from("Churned");
        assert_eq!(status, CustomerStatus::Other("Churned".to_string()));
        assert_eq!(status.to_string(), "Churned");
    }

    #[test]
    fn test_status_matching_is_case_sensitive() {
        assert_eq!(
            CustomerStatus::from("Active"),
            CustomerStatus::Other("Active".to_string())
        );
        assert_eq!(LeadStatus::from("NEW"), LeadStatus::Other("NEW".to_string()));
    }

    #[test]
    fn test_lead_status_round_trip_through_string() {
        for raw in ["new", "contacted", "qualified", "proposal", "won", "lost"] {
            let status = LeadStatus::from(raw);
            assert!(!matches!(status, LeadStatus::Other(_)));
            assert_eq!(String::from(status), raw);
        }
    }

    // ---- Deserialization ----

    #[test]
    fn test_deserialize_demo_shape() {
        let json = r#"{
            "customers": [{
                "id": 1,
                "name": "John Smith",
                "email": "john.smith@techcorp.com",
                "phone": "+1 (555) 123-4567",
                "company": "TechCorp Solutions",
                "address": "123 Business Ave",
                "status": "active",
                "createdAt": "2024-01-15T10:30:00.000Z"
            }],
            "leads": [{
                "id": "b6f1c3de-0000-4000-8000-000000000001",
                "name": "Emily Davis",
                "email": "emily.davis@startup123.com",
                "source": "website",
                "status": "new",
                "score": 75,
                "budget": "$10,000 - $25,000",
                "created_at": "2024-02-10T11:20:00Z"
            }]
        }"#;

        let snapshot = DataSnapshot::from_json_str(json).unwrap();
        assert_eq!(snapshot.customers.len(), 1);
        assert_eq!(snapshot.leads.len(), 1);
        assert!(snapshot.contacts.is_empty());

        let c = &snapshot.customers[0];
        assert_eq!(c.id.as_str(), "1");
        assert_eq!(c.status, Some(CustomerStatus::Active));
        assert_eq!(
            c.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );

        let l = &snapshot.leads[0];
        assert_eq!(l.id.as_str(), "b6f1c3de-0000-4000-8000-000000000001");
        assert_eq!(l.score, Some(75));
        assert_eq!(l.source.as_deref(), Some("website"));
        assert!(l.created_at.is_some());
    }

    #[test]
    fn test_deserialize_missing_and_null_fields() {
        let json = r#"{"contacts": [{"id": 9, "name": "Robin", "phone": null, "status": null}]}"#;
        let snapshot = DataSnapshot::from_json_str(json).unwrap();
        let contact = &snapshot.contacts[0];
        assert_eq!(contact.email, "");
        assert!(contact.phone.is_none());
        assert!(contact.title().is_none());
        assert!(contact.created_at.is_none());

        let json = r#"{"customers": [{"id": 2, "name": "Ann", "status": null}]}"#;
        let snapshot = DataSnapshot::from_json_str(json).unwrap();
        assert!(snapshot.customers[0].status.is_none());
    }

    #[test]
    fn test_deserialize_invalid_json_is_serialization_error() {
        let err = DataSnapshot::from_json_str("{\"customers\": 3}").unwrap_err();
        assert!(matches!(err, PulseError::Serialization(_)));
    }

    #[test]
    fn test_empty_strings_read_as_absent() {
        let mut c = customer(1, "Ann", Some(""));
        c.phone = Some(String::new());
        assert!(c.company().is_none());
        assert!(c.phone().is_none());
    }

    #[test]
    fn test_record_trait_exposes_shared_fields() {
        fn describe<R: CrmRecord>(record: &R) -> (String, bool) {
            (
                format!("{} <{}>", record.name(), record.email()),
                record.created_at().is_some(),
            )
        }

        let mut c = customer(1, "Ann", None);
        c.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        assert_eq!(describe(&c), ("Ann <ann@example.com>".to_string(), true));
        assert_eq!(describe(&lead(2, "Bo", None)), ("Bo <>".to_string(), false));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, r#"{"leads": [{"id": 1, "name": "Lisa Chen", "score": 90}]}"#)
            .unwrap();
        let snapshot = DataSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.leads[0].name, "Lisa Chen");
        assert!(!snapshot.is_empty());
    }

    // ---- Validation ----

    #[test]
    fn test_validate_ok() {
        let snapshot = DataSnapshot::new(
            vec![customer(1, "Ann", None), customer(2, "Bob", None)],
            vec![lead(1, "Cy", Some(100)), lead(2, "Di", Some(0))],
            vec![],
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_id() {
        let snapshot = DataSnapshot::new(
            vec![customer(1, "Ann", None), customer(1, "Bob", None)],
            vec![],
            vec![],
        );
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid snapshot: duplicate customer id 1");
    }

    #[test]
    fn test_validate_same_id_across_collections_is_fine() {
        let snapshot = DataSnapshot::new(
            vec![customer(1, "Ann", None)],
            vec![lead(1, "Cy", None)],
            vec![],
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_validate_score_out_of_range() {
        let snapshot = DataSnapshot::new(vec![], vec![lead(4, "Cy", Some(101))], vec![]);
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, PulseError::InvalidSnapshot(_)));
        assert!(err.to_string().contains("lead 4 has score 101"));
    }

    // ---- Ordering ----

    #[test]
    fn test_newest_first_orders_and_puts_undated_last() {
        let mut older = customer(1, "Older", None);
        older.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let undated = customer(2, "Undated", None);
        let mut newer = customer(3, "Newer", None);
        newer.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        let snapshot = DataSnapshot::new(vec![older, undated, newer], vec![], vec![]).newest_first();
        let names: Vec<&str> = snapshot.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older", "Undated"]);
    }

    // ---- Companies ----

    #[test]
    fn test_distinct_companies_first_seen_order() {
        let mut l = lead(1, "Cy", None);
        l.company = Some("Initech".to_string());
        let contact = ContactRecord {
            id: RecordId::from(1),
            name: "Dee".to_string(),
            email: String::new(),
            phone: None,
            company: Some("Umbrella".to_string()),
            title: None,
            department: None,
            created_at: None,
        };
        let snapshot = DataSnapshot::new(
            vec![
                customer(1, "Ann", Some("Acme")),
                customer(2, "Bob", None),
                customer(3, "Cat", Some("Initech")),
            ],
            vec![l],
            vec![contact],
        );

        assert_eq!(snapshot.distinct_companies(true), vec!["Acme", "Initech", "Umbrella"]);
        assert_eq!(snapshot.distinct_companies(false), vec!["Acme", "Initech"]);
    }
}
