//! The client session: one batch, one signer, one transport.

use serde_json::Value;

use crate::batch::{TaskBatch, TaskOperation};
use crate::consts::now_secs;
use crate::error::Result;
use crate::signer::{RequestSigner, SignedRequest};
use crate::transport::Transport;

/// Batches tasks and submits them, signed, to the platform.
pub struct Client {
    signer: RequestSigner,
    transport: Box<dyn Transport>,
    batch: TaskBatch,
}

impl Client {
    pub fn new(signer: RequestSigner, transport: Box<dyn Transport>) -> Self {
        Self {
            signer,
            transport,
            batch: TaskBatch::new(),
        }
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Queue a task for process `conv_id`. `data` defaults to `{}`.
    pub fn add_task(
        &mut self,
        reference: impl Into<String>,
        conv_id: impl Into<String>,
        data: Option<Value>,
    ) -> Result<()> {
        self.batch.append(reference, conv_id, data)
    }

    /// Pending operations, in submission order.
    pub fn tasks(&self) -> &[TaskOperation] {
        self.batch.operations()
    }

    pub fn clear_tasks(&mut self) {
        self.batch.clear();
    }

    /// Serialize and sign the pending batch at `timestamp`.
    pub fn prepare(&self, timestamp: u64) -> Result<SignedRequest> {
        let body = self.batch.to_body()?;
        Ok(self.signer.sign(timestamp, body))
    }

    /// Send the pending batch, signed with the current time, and return the
    /// raw response body.
    ///
    /// With `clear_tasks` the batch is emptied once the transport succeeds.
    /// On failure the batch is always kept, so the caller can retry.
    pub async fn send_tasks(&mut self, clear_tasks: bool) -> Result<String> {
        self.send_tasks_at(now_secs()?, clear_tasks).await
    }

    /// [`send_tasks`](Self::send_tasks) with an explicit timestamp.
    pub async fn send_tasks_at(&mut self, timestamp: u64, clear_tasks: bool) -> Result<String> {
        let request = self.prepare(timestamp)?;
        tracing::info!(
            ops = self.batch.len(),
            timestamp,
            login = self.signer.login(),
            "sending task batch"
        );

        let response = self.transport.post(&request.url, &request.body).await?;

        if clear_tasks {
            self.batch.clear();
        }
        Ok(response)
    }

    /// Check the signature on an inbound callback.
    pub fn check_sign(&self, signature: &str, timestamp: u64, body: &str) -> bool {
        let ok = self.signer.verify_signature(signature, timestamp, body);
        if !ok {
            tracing::debug!(timestamp, "callback signature mismatch");
        }
        ok
    }
}
