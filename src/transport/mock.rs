use async_trait::async_trait;
use std::sync::Mutex;

use super::Transport;
use crate::error::{Error, Result};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub body: String,
}

/// A scripted transport for tests. Records every request and answers with
/// pre-defined responses in order.
pub struct MockTransport {
    responses: Mutex<Vec<Result<String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Responses are handed out first to last.
    pub fn new(responses: Vec<Result<String>>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers the first `times` requests with `body`.
    pub fn replying(body: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(body.to_string())).collect())
    }

    /// Fails the first request with a transport error.
    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(Error::transport(message.to_string()))])
    }

    /// Everything posted so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: &str) -> Result<String> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(RecordedRequest {
                url: url.to_string(),
                body: body.to_string(),
            });
            requests.len()
        };
        self.responses.lock().unwrap().pop().unwrap_or_else(|| {
            Err(Error::transport(format!(
                "MockTransport: no more responses (called {n} times)"
            )))
        })
    }
}
