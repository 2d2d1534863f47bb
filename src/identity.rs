//! Acting-admin resolution for console commands.
//!
//! Every command that changes a record or reads the admin log acts on
//! behalf of an admin, and that admin's id is what the audit trail records.
//! Rather than requiring `--as` on every invocation, the admin is resolved
//! through a chain:
//!
//! 1. `--as <admin>`, an explicit per-command override
//! 2. `OPSDESK_ADMIN` env var, set once per shell session
//! 3. `admin-id` in `~/.opsdesk/config.toml`, for single-admin machines

use std::env;

use crate::config::Config;

/// Environment variable naming the acting admin.
pub const ADMIN_ENV: &str = "OPSDESK_ADMIN";

/// Error message shown when no admin can be resolved.
pub const ADMIN_REQUIRED: &str = "admin required: pass --as <admin>, \
    set OPSDESK_ADMIN, or add `admin-id = \"...\"` to ~/.opsdesk/config.toml";

/// Resolve the acting admin from the tiered resolution chain.
///
/// Returns an error with [`ADMIN_REQUIRED`] when none of the sources yield
/// a value.
pub fn resolve_admin(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    let from_env = env::var(ADMIN_ENV).ok();
    resolve_from(explicit, from_env.as_deref(), config)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    config: &Config,
) -> Result<String, String> {
    [explicit, from_env, config.admin_id()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| ADMIN_REQUIRED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(admin: &str) -> Config {
        Config {
            admin_id: Some(admin.into()),
            ..Config::default()
        }
    }

    #[test]
    fn explicit_wins() {
        let result = resolve_from(Some("ana"), Some("ben"), &config_with("cruz"));
        assert_eq!(result.unwrap(), "ana");
    }

    #[test]
    fn env_beats_config() {
        let result = resolve_from(None, Some("ben"), &config_with("cruz"));
        assert_eq!(result.unwrap(), "ben");
    }

    #[test]
    fn config_is_last_resort() {
        let result = resolve_from(None, None, &config_with("cruz"));
        assert_eq!(result.unwrap(), "cruz");
    }

    #[test]
    fn blank_env_falls_through() {
        let result = resolve_from(None, Some(""), &config_with("cruz"));
        assert_eq!(result.unwrap(), "cruz");
    }

    #[test]
    fn nothing_configured() {
        let err = resolve_from(None, None, &Config::default()).unwrap_err();
        assert_eq!(err, ADMIN_REQUIRED);
    }
}
