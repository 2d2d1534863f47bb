//! Audit recording.
//!
//! Every accepted status change and every creation is reported to an
//! [`AuditRecorder`], an append-only sink of [`AdminLog`] entries. The
//! recorder, not the caller, assigns the entry id and `created_at`.
//!
//! Audit writes are best-effort: callers treat a failed append as
//! "changed, audit uncertain" and never roll back the change itself.

use std::sync::Mutex;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::AdminLog;

/// Errors from an audit sink.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    WriteFailed(String),
}

/// What the caller supplies for an audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDraft {
    pub admin_id: String,
    pub action: String,
    pub details: Option<String>,
}

impl AuditDraft {
    pub fn new(admin_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            admin_id: admin_id.into(),
            action: action.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Seals the draft into an immutable entry created at `at`.
    pub fn seal(self, at: Timestamp) -> AdminLog {
        AdminLog {
            id: Uuid::new_v4(),
            admin_id: self.admin_id,
            action: self.action,
            details: self.details,
            created_at: at,
        }
    }
}

/// An append-only audit sink.
pub trait AuditRecorder {
    /// Appends one entry and returns it as recorded.
    fn append(&self, draft: AuditDraft) -> Result<AdminLog, AuditError>;
}

/// In-process recorder holding entries in creation order.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    entries: Mutex<Vec<AdminLog>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every entry recorded so far.
    pub fn entries(&self) -> Vec<AdminLog> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditRecorder for MemoryRecorder {
    fn append(&self, draft: AuditDraft) -> Result<AdminLog, AuditError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::WriteFailed("recorder lock poisoned".into()))?;
        // Keep creation order and creation time in agreement.
        let now = Timestamp::now();
        let at = entries
            .last()
            .map_or(now, |last| now.max(last.created_at));
        let entry = draft.seal(at);
        entries.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_recorder_appends_in_order() {
        let recorder = MemoryRecorder::new();
        recorder
            .append(AuditDraft::new("admin-01", "order.status_changed").details("a -> b"))
            .unwrap();
        recorder
            .append(AuditDraft::new("admin-02", "drone.registered"))
            .unwrap();

        let entries = recorder.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "order.status_changed");
        assert_eq!(entries[0].details.as_deref(), Some("a -> b"));
        assert_eq!(entries[1].details, None);
        assert!(entries[0].created_at <= entries[1].created_at);
    }

    #[test]
    fn recorder_assigns_distinct_ids() {
        let recorder = MemoryRecorder::new();
        let a = recorder.append(AuditDraft::new("admin", "x")).unwrap();
        let b = recorder.append(AuditDraft::new("admin", "x")).unwrap();
        assert_ne!(a.id, b.id);
    }
}
