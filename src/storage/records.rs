//! Record storage: insert, load, list, and version-checked replace.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, Transaction, TransactionBehavior};

use crate::model::Entity;

use super::{Result, Storage, StorageError};

impl Storage {
    /// Inserts a new record.
    ///
    /// Unique keys are checked inside the same write transaction, before the
    /// row is written; a clash fails with [`StorageError::DuplicateKey`] and
    /// leaves the table untouched.
    pub fn insert<R: Entity>(&self, record: &R) -> Result<()> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        insert_in(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts a batch of records atomically: all of them or none.
    pub fn insert_all<R: Entity>(&self, records: &[R]) -> Result<()> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        for record in records {
            insert_in(&tx, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Loads a single record by id.
    pub fn fetch<R: Entity>(&self, id: &str) -> Result<R> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE kind = ?1 AND id = ?2",
                rusqlite::params![R::KIND.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        let body = body.ok_or_else(|| StorageError::RecordNotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;
        decode(&body)
    }

    /// Loads every record of one kind in insertion order.
    pub fn fetch_all<R: Entity>(&self) -> Result<Vec<R>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM records WHERE kind = ?1 ORDER BY seq")?;
        let bodies = stmt.query_map([R::KIND.as_str()], |row| row.get::<_, String>(0))?;
        let mut records = Vec::new();
        for body in bodies {
            records.push(decode(&body?)?);
        }
        Ok(records)
    }

    /// Number of stored records of one kind.
    pub fn count<R: Entity>(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE kind = ?1",
            [R::KIND.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(n).map_err(|e| StorageError::Corrupt(format!("negative count: {e}")))
    }

    /// Replaces a record, provided nobody wrote it since `expected_updated_at`.
    ///
    /// The check and the write are one statement, so two writers racing on
    /// the same record cannot both succeed.
    pub fn replace<R: Entity>(&self, record: &R, expected_updated_at: Timestamp) -> Result<()> {
        let body = serde_json::to_string(record)?;
        let rows = self.conn.execute(
            "UPDATE records SET body = ?1, updated_at = ?2
             WHERE kind = ?3 AND id = ?4 AND updated_at = ?5",
            rusqlite::params![
                body,
                record.timestamps().updated_at.to_string(),
                R::KIND.as_str(),
                record.id(),
                expected_updated_at.to_string(),
            ],
        )?;
        if rows == 1 {
            return Ok(());
        }

        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM records WHERE kind = ?1 AND id = ?2)",
            rusqlite::params![R::KIND.as_str(), record.id()],
            |row| row.get(0),
        )?;
        let (kind, id) = (R::KIND, record.id().to_string());
        Err(if exists {
            StorageError::StaleRecord { kind, id }
        } else {
            StorageError::RecordNotFound { kind, id }
        })
    }
}

fn insert_in<R: Entity>(tx: &Transaction<'_>, record: &R) -> Result<()> {
    let body = serde_json::to_value(record)?;

    for &key in R::UNIQUE_KEYS {
        let value = body
            .get(key)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| StorageError::Corrupt(format!("{} has no string {key}", R::KIND)))?;
        let taken: bool = tx.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM records WHERE kind = ?1 AND json_extract(body, ?2) = ?3
             )",
            rusqlite::params![R::KIND.as_str(), format!("$.{key}"), value],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::DuplicateKey {
                kind: R::KIND,
                key,
                value: value.to_string(),
            });
        }
    }

    let ts = record.timestamps();
    let result = tx.execute(
        "INSERT INTO records (kind, id, body, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            R::KIND.as_str(),
            record.id(),
            body.to_string(),
            ts.created_at.to_string(),
            ts.updated_at.to_string(),
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::RecordAlreadyExists {
                kind: R::KIND,
                id: record.id().to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn decode<R: Entity>(body: &str) -> Result<R> {
    serde_json::from_str(body)
        .map_err(|e| StorageError::Corrupt(format!("unreadable {} record: {e}", R::KIND)))
}
