//! Client for the Corezoid process-automation API.
//!
//! Tasks are queued in a [`TaskBatch`](batch::TaskBatch), serialized to
//! `{"ops": [...]}`, signed by a [`RequestSigner`](signer::RequestSigner)
//! and posted through a [`Transport`](transport::Transport). The same
//! signer verifies signatures on inbound callbacks.

pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod signer;
pub mod transport;

pub use auth::Credentials;
pub use batch::{TaskBatch, TaskOperation};
pub use client::Client;
pub use error::{Error, Result};
pub use signer::{ApiConfig, RequestSigner, SignedRequest};
