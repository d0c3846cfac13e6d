//! Error types for the Corezoid client.

use thiserror::Error;

/// Errors raised by the client.
///
/// Validation failures are raised where the bad input enters (signer
/// construction, `add_task`), never at send time. A signature mismatch is
/// not an error: [`RequestSigner::verify_signature`](crate::signer::RequestSigner::verify_signature)
/// returns `false`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Failure reported by the [`Transport`](crate::transport::Transport),
    /// passed through unchanged.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Wrap a transport failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    /// Name of the offending field, for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with a validation error if `value` is empty.
pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Fail unless `value` is a non-empty run of unreserved URL characters
/// (RFC 3986: ALPHA / DIGIT / "-" / "." / "_" / "~").
pub(crate) fn require_url_safe(field: &'static str, value: &str) -> Result<()> {
    require_non_empty(field, value)?;
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
    {
        return Err(Error::validation(
            field,
            format!("character {c:?} is not URL-safe"),
        ));
    }
    Ok(())
}
