pub mod http;
pub mod mock;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Delivers a signed request body to the platform.
///
/// Implementations return the raw response body unmodified and own their
/// timeout policy. No retries happen at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: &str) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, url: &str, body: &str) -> Result<String> {
        (**self).post(url, body).await
    }
}
