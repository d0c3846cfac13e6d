//! Request signing and URL assembly.
//!
//! Every request carries its signature in the URL path:
//!
//! ```text
//! {host}/api/{version}/{format}/{login}/{timestamp}/{signature}
//! ```
//!
//! and the platform signs its callbacks with the same algorithm, so
//! [`RequestSigner::verify_signature`] uses it to authenticate them.

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::auth::Credentials;
use crate::consts::{API_FORMAT, DEFAULT_API_VERSION, DEFAULT_HOST};
use crate::error::{Error, Result, require_url_safe};

/// Endpoint constants. Host and version are overridable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    host: String,
    version: String,
    format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            format: API_FORMAT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Override the base URL. A trailing `/` is dropped.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the API version segment.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Check that every component can go into a request URL as is.
    pub fn validate(&self) -> Result<()> {
        let rest = self
            .host
            .strip_prefix("https://")
            .or_else(|| self.host.strip_prefix("http://"))
            .ok_or_else(|| Error::validation("host", "must start with http:// or https://"))?;
        if rest.is_empty() || rest.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
            return Err(Error::validation("host", format!("malformed base URL {:?}", self.host)));
        }
        require_url_safe("version", &self.version)?;
        require_url_safe("format", &self.format)?;
        Ok(())
    }
}

/// A fully prepared request. Built per send and never reused: the
/// timestamp has to be the send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp: u64,
    pub body: String,
    pub signature: String,
    pub url: String,
}

/// Computes signatures and signed URLs from one set of credentials.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    api: ApiConfig,
}

impl RequestSigner {
    /// Build a signer, validating every URL component up front.
    pub fn new(credentials: Credentials, api: ApiConfig) -> Result<Self> {
        require_url_safe("api_login", credentials.login())?;
        api.validate()?;
        Ok(Self { credentials, api })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn login(&self) -> &str {
        self.credentials.login()
    }

    /// Lowercase hex SHA-1 of `timestamp ‖ secret ‖ body ‖ secret`, no
    /// separators.
    ///
    /// WARNING: secret-prefix/suffix hashing over SHA-1 is a weak MAC and
    /// not HMAC. It must stay byte-for-byte as is, since the platform
    /// verifies exactly this construction.
    pub fn build_signature(&self, timestamp: u64, body: &str) -> String {
        let secret = self.credentials.secret().as_bytes();
        let mut hasher = Sha1::new();
        hasher.update(timestamp.to_string().as_bytes());
        hasher.update(secret);
        hasher.update(body.as_bytes());
        hasher.update(secret);
        hex::encode(hasher.finalize())
    }

    /// `{host}/api/{version}/{format}/{login}/{timestamp}/{signature}`.
    pub fn build_url(&self, timestamp: u64, body: &str) -> String {
        let signature = self.build_signature(timestamp, body);
        self.url_for(timestamp, &signature)
    }

    fn url_for(&self, timestamp: u64, signature: &str) -> String {
        let timestamp = timestamp.to_string();
        [
            self.api.host.as_str(),
            "api",
            self.api.version.as_str(),
            self.api.format.as_str(),
            self.credentials.login(),
            timestamp.as_str(),
            signature,
        ]
        .join("/")
    }

    /// Sign a serialized body at `timestamp`.
    pub fn sign(&self, timestamp: u64, body: impl Into<String>) -> SignedRequest {
        let body = body.into();
        let signature = self.build_signature(timestamp, &body);
        let url = self.url_for(timestamp, &signature);
        tracing::debug!(timestamp, body_len = body.len(), "signed request");
        SignedRequest {
            timestamp,
            body,
            signature,
            url,
        }
    }

    /// Check an inbound `(signature, timestamp, body)` triple.
    pub fn verify_signature(&self, candidate: &str, timestamp: u64, body: &str) -> bool {
        let expected = self.build_signature(timestamp, body);
        expected.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}
