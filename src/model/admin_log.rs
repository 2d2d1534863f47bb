//! Admin log entries: the append-only audit trail.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{Listing, Record};

/// One immutable audit entry.
///
/// Written once by the recorder, which also assigns `created_at`.
/// Entries carry no update timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLog {
    pub id: Uuid,
    pub admin_id: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

impl Record for AdminLog {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "admin_id" => Some(&self.admin_id),
            "action" => Some(&self.action),
            "details" => self.details.as_deref(),
            _ => None,
        }
    }
}

impl Listing for AdminLog {
    const SEARCH_FIELDS: &'static [&'static str] = &["action", "details", "admin_id"];
    const FACET_FIELDS: &'static [&'static str] = &["admin_id"];
}
