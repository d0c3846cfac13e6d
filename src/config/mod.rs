//! Key-value configuration storage backed by SQLite.
//!
//! Shares a database with [`CredentialStore`](crate::auth::CredentialStore);
//! pass the same path to both. The keys that matter are [`HOST_KEY`] and
//! [`VERSION_KEY`], which override the [`ApiConfig`] defaults.

use rusqlite::Connection;
use std::sync::Mutex;

use crate::error::Result;
use crate::signer::ApiConfig;

pub const HOST_KEY: &str = "host";
pub const VERSION_KEY: &str = "version";

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert). `host` and `version` are validated
    /// before they are stored.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match key {
            HOST_KEY => ApiConfig::default().with_host(value).validate()?,
            VERSION_KEY => ApiConfig::default().with_version(value).validate()?,
            _ => {}
        }
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Defaults with any stored `host` / `version` overrides applied.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let mut api = ApiConfig::default();
        if let Some(host) = self.get(HOST_KEY)? {
            api = api.with_host(host);
        }
        if let Some(version) = self.get(VERSION_KEY)? {
            api = api.with_version(version);
        }
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_API_VERSION, DEFAULT_HOST};

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(HOST_KEY, "https://old.example").unwrap();
        config.set(HOST_KEY, "https://new.example").unwrap();
        assert_eq!(config.get(HOST_KEY).unwrap().unwrap(), "https://new.example");
    }

    #[test]
    fn remove_nonexistent_is_ok() {
        let config = mem_config();
        config.remove("nonexistent").unwrap();
    }

    #[test]
    fn api_config_uses_defaults_when_empty() {
        let api = mem_config().api_config().unwrap();
        assert_eq!(api.host(), DEFAULT_HOST);
        assert_eq!(api.version(), DEFAULT_API_VERSION);
    }

    #[test]
    fn api_config_applies_overrides() {
        let config = mem_config();
        config.set(HOST_KEY, "https://staging.example").unwrap();
        config.set(VERSION_KEY, "2").unwrap();

        let api = config.api_config().unwrap();
        assert_eq!(api.host(), "https://staging.example");
        assert_eq!(api.version(), "2");
    }

    #[test]
    fn invalid_host_is_rejected_before_saving() {
        let config = mem_config();
        for host in ["ftp://nope", "example.com", "https://a b"] {
            let err = config.set(HOST_KEY, host).unwrap_err();
            assert_eq!(err.field(), Some("host"), "host {host:?}");
        }
        assert!(config.get(HOST_KEY).unwrap().is_none());
        assert_eq!(config.api_config().unwrap().host(), DEFAULT_HOST);
    }

    #[test]
    fn invalid_version_is_rejected_before_saving() {
        let config = mem_config();
        config.set(VERSION_KEY, "2").unwrap();

        let err = config.set(VERSION_KEY, "2/beta").unwrap_err();
        assert_eq!(err.field(), Some("version"));
        assert_eq!(config.get(VERSION_KEY).unwrap().unwrap(), "2");
    }

    #[test]
    fn other_keys_are_not_validated() {
        let config = mem_config();
        config.set("note", "anything / goes").unwrap();
        assert_eq!(config.get("note").unwrap().unwrap(), "anything / goes");
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(VERSION_KEY, "2").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.get(VERSION_KEY).unwrap().unwrap(), "2");
        }
    }
}
