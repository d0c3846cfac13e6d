//! Project-wide constants.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Production API host.
pub const DEFAULT_HOST: &str = "https://www.corezoid.com";

/// API version path segment.
pub const DEFAULT_API_VERSION: &str = "1";

/// API format path segment. The only format this client speaks.
pub const API_FORMAT: &str = "json";

/// Environment variables consulted when no stored credentials exist.
pub const LOGIN_ENV_VAR: &str = "COREZOID_API_LOGIN";
pub const SECRET_ENV_VAR: &str = "COREZOID_API_SECRET";

/// Credential profile used when none is named.
pub const DEFAULT_PROFILE: &str = "default";

/// Default request timeout for the HTTP transport.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default database path: `~/.corezoid/corezoid.db`.
/// Single DB for credentials and config.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".corezoid").join("corezoid.db"))
}

/// Current UNIX time in whole seconds.
///
/// Fails if the system clock reads before the epoch; a zero timestamp would
/// only be rejected later by the platform's replay check.
pub fn now_secs() -> Result<u64> {
    secs_since_epoch(SystemTime::now())
}

fn secs_since_epoch(time: SystemTime) -> Result<u64> {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| {
            tracing::warn!(behind = ?e.duration(), "system clock is before the UNIX epoch");
            Error::validation("timestamp", "system clock is before the UNIX epoch")
        })
}
