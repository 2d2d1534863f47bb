//! Admin log storage: append and load audit entries.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::audit::{AuditDraft, AuditError, AuditRecorder};
use crate::model::AdminLog;

use super::{Result, Storage, StorageError};

impl Storage {
    /// Appends an audit entry, stamping it with the current time.
    ///
    /// `created_at` never goes backwards relative to the previous entry, so
    /// creation order and insertion order agree.
    pub fn append_admin_log(&self, draft: AuditDraft) -> Result<AdminLog> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let last: Option<String> = tx
            .query_row(
                "SELECT created_at FROM admin_logs ORDER BY seq DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let now = Timestamp::now();
        let at = match last {
            Some(last) => now.max(parse_timestamp(&last)?),
            None => now,
        };

        let entry = draft.seal(at);
        tx.execute(
            "INSERT INTO admin_logs (id, admin_id, action, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                entry.id.to_string(),
                &entry.admin_id,
                &entry.action,
                &entry.details,
                entry.created_at.to_string(),
            ],
        )?;
        tx.commit()?;
        Ok(entry)
    }

    /// Loads the whole admin log, oldest first.
    pub fn load_admin_logs(&self) -> Result<Vec<AdminLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, admin_id, action, details, created_at FROM admin_logs ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, admin_id, action, details, created_at) = row?;
            entries.push(AdminLog {
                id: id
                    .parse::<Uuid>()
                    .map_err(|e| StorageError::Corrupt(format!("invalid admin log id: {e}")))?,
                admin_id,
                action,
                details,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(entries)
    }
}

impl AuditRecorder for Storage {
    fn append(&self, draft: AuditDraft) -> core::result::Result<AdminLog, AuditError> {
        self.append_admin_log(draft)
            .map_err(|e| AuditError::WriteFailed(e.to_string()))
    }
}

fn parse_timestamp(s: &str) -> Result<Timestamp> {
    s.parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("opsdesk")).unwrap();
        (dir, storage)
    }

    #[test]
    fn append_and_load() {
        let (_dir, storage) = test_storage();

        storage
            .append(
                AuditDraft::new("admin-01", "order.status_changed")
                    .details("pending -> processing"),
            )
            .unwrap();
        storage
            .append(AuditDraft::new("admin-02", "drone.registered"))
            .unwrap();

        let entries = storage.load_admin_logs().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].admin_id, "admin-01");
        assert_eq!(entries[0].details.as_deref(), Some("pending -> processing"));
        assert_eq!(entries[1].action, "drone.registered");
        assert_eq!(entries[1].details, None);
        assert!(entries[0].created_at <= entries[1].created_at);
    }

    #[test]
    fn load_empty() {
        let (_dir, storage) = test_storage();
        assert!(storage.load_admin_logs().unwrap().is_empty());
    }

    #[test]
    fn appended_entry_round_trips() {
        let (_dir, storage) = test_storage();
        let written = storage
            .append_admin_log(AuditDraft::new("admin-01", "payment.created"))
            .unwrap();

        let loaded = storage.load_admin_logs().unwrap();
        assert_eq!(loaded, vec![written]);
    }

    #[test]
    fn entries_cannot_be_updated_or_deleted() {
        let (_dir, storage) = test_storage();
        storage
            .append_admin_log(AuditDraft::new("admin-01", "payment.created"))
            .unwrap();

        let update = storage
            .conn
            .execute("UPDATE admin_logs SET action = 'tampered'", []);
        let delete = storage.conn.execute("DELETE FROM admin_logs", []);

        assert!(update.is_err());
        assert!(delete.is_err());
        assert_eq!(storage.load_admin_logs().unwrap()[0].action, "payment.created");
    }
}
