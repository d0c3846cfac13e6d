pub mod storage;

pub use storage::CredentialStore;

use std::fmt;
use std::io::BufRead;

use crate::consts::{LOGIN_ENV_VAR, SECRET_ENV_VAR};
use crate::error::{Error, Result, require_non_empty};

/// API login and shared secret. Both are non-empty by construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    secret: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let login = login.into();
        let secret = secret.into();
        require_non_empty("api_login", &login)?;
        require_non_empty("api_secret", &secret)?;
        Ok(Self { login, secret })
    }

    /// Read `COREZOID_API_LOGIN` / `COREZOID_API_SECRET`.
    pub fn from_env() -> Result<Self> {
        let login = std::env::var(LOGIN_ENV_VAR)
            .map_err(|_| Error::validation("api_login", format!("{LOGIN_ENV_VAR} is not set")))?;
        let secret = std::env::var(SECRET_ENV_VAR)
            .map_err(|_| Error::validation("api_secret", format!("{SECRET_ENV_VAR} is not set")))?;
        Self::new(login, secret)
    }

    /// Pair `login` with a secret read as one line from `input`.
    ///
    /// The trailing newline is dropped; an empty line is rejected like any
    /// other empty secret.
    pub fn with_secret_from(login: impl Into<String>, input: &mut impl BufRead) -> Result<Self> {
        let mut secret = String::new();
        input
            .read_line(&mut secret)
            .map_err(|e| Error::validation("api_secret", format!("failed to read: {e}")))?;
        Self::new(login, secret.trim_end_matches(['\r', '\n']))
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Resolve credentials for a profile.
/// Priority: stored profile → environment variables.
pub fn resolve(store: Option<&CredentialStore>, profile: &str) -> Result<Credentials> {
    if let Some(store) = store
        && let Some(creds) = store.get(profile)?
    {
        tracing::debug!(profile, login = creds.login(), "using stored credentials");
        return Ok(creds);
    }
    tracing::debug!("falling back to environment credentials");
    Credentials::from_env()
}
