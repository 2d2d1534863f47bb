//! Local persistence for console collections and the admin log.
//!
//! Everything lives in one `SQLite` file under the storage root:
//!
//! ```text
//! <root>/opsdesk.sqlite
//!   records      # every entity as a JSON body, keyed by (kind, id), in insertion order
//!   admin_logs   # append-only audit trail; UPDATE and DELETE are refused by triggers
//! ```

mod admin_log;
mod records;

use std::path::{Path, PathBuf};
use std::{fs, io};

use rusqlite::Connection;

use crate::model::EntityKind;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: EntityKind, id: String },

    #[error("{kind} already exists: {id}")]
    RecordAlreadyExists { kind: EntityKind, id: String },

    #[error("{kind} with {key} '{value}' already exists")]
    DuplicateKey {
        kind: EntityKind,
        key: &'static str,
        value: String,
    },

    #[error("{kind} {id} was modified by someone else; reload and retry")]
    StaleRecord { kind: EntityKind, id: String },

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const DB_FILE: &str = "opsdesk.sqlite";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS records (
        seq         INTEGER PRIMARY KEY AUTOINCREMENT,
        kind        TEXT NOT NULL,
        id          TEXT NOT NULL,
        body        TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        UNIQUE (kind, id)
    );

    CREATE TABLE IF NOT EXISTS admin_logs (
        seq         INTEGER PRIMARY KEY AUTOINCREMENT,
        id          TEXT NOT NULL UNIQUE,
        admin_id    TEXT NOT NULL,
        action      TEXT NOT NULL,
        details     TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE TRIGGER IF NOT EXISTS admin_logs_no_update
    BEFORE UPDATE ON admin_logs
    BEGIN
        SELECT RAISE(ABORT, 'admin_logs is append-only');
    END;

    CREATE TRIGGER IF NOT EXISTS admin_logs_no_delete
    BEFORE DELETE ON admin_logs
    BEGIN
        SELECT RAISE(ABORT, 'admin_logs is append-only');
    END;
";

/// `SQLite`-backed storage for console records.
pub struct Storage {
    conn: Connection,
    path: PathBuf,
}

impl Storage {
    /// Opens (or creates) the database under `root`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Self::open(root.join(DB_FILE))
    }

    /// Opens (or creates) a database file at an explicit path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Returns the default storage root: `~/.opsdesk/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".opsdesk"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
