//! Opsdesk configuration.
//!
//! Loaded from `~/.opsdesk/config.toml`. Every key is optional and a
//! missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::query::PageSize;

/// Opsdesk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// The acting admin when neither `--as` nor `OPSDESK_ADMIN` is set.
    pub admin_id: Option<String>,

    /// Rows per page for list commands without `--page-size`.
    pub page_size: PageSize,

    /// A `tracing` filter directive such as `info` or `opsdesk=debug`.
    pub log_level: Option<String>,

    /// Database file, overriding `<root>/opsdesk.sqlite`.
    pub database: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.opsdesk/config.toml`.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.opsdesk/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".opsdesk").join("config.toml"))
    }

    /// The configured admin, ignoring blank values.
    pub fn admin_id(&self) -> Option<&str> {
        self.admin_id.as_deref().filter(|s| !s.trim().is_empty())
    }
}
