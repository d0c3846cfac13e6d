use std::sync::Mutex;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::Credentials;
use crate::error::Result;

/// On-disk form. Validated through [`Credentials::new`] on load.
#[derive(Serialize, Deserialize)]
struct StoredCredentials {
    login: String,
    secret: String,
}

/// Named credential profiles in SQLite.
///
/// Shares a database with [`Config`](crate::config::Config); pass the same
/// path to both.
pub struct CredentialStore {
    conn: Mutex<Connection>,
}

impl CredentialStore {
    /// Open or create the credentials table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                profile TEXT PRIMARY KEY,
                data    TEXT NOT NULL
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get credentials for a profile.
    pub fn get(&self, profile: &str) -> Result<Option<Credentials>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT data FROM credentials WHERE profile = ?1")?;
        let mut rows = stmt.query([profile])?;
        match rows.next()? {
            Some(row) => {
                let json: String = row.get(0)?;
                let stored: StoredCredentials = serde_json::from_str(&json)?;
                Ok(Some(Credentials::new(stored.login, stored.secret)?))
            }
            None => Ok(None),
        }
    }

    /// Store credentials for a profile (upsert).
    pub fn set(&self, profile: &str, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string(&StoredCredentials {
            login: credentials.login().to_string(),
            secret: credentials.secret().to_string(),
        })?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credentials (profile, data) VALUES (?1, ?2)
             ON CONFLICT(profile) DO UPDATE SET data = excluded.data",
            [profile, &json],
        )?;
        Ok(())
    }

    /// Remove credentials for a profile.
    pub fn remove(&self, profile: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM credentials WHERE profile = ?1", [profile])?;
        Ok(())
    }
}
