//! Session-scoped client for the vaidhya conversational backend
//!
//! `SessionClient` owns the persisted session identifier and every HTTP
//! exchange with the backend. Failures reach callers as one of the two
//! `ClientError` kinds; nothing is retried and nothing is swallowed.

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, StorageError, TransportFailure};
pub use session::{generate_session_id, SessionClient};
pub use store::{KeyValueStore, MemoryStore};
pub use transport::{HttpResponse, HttpTransport};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;

use vaidhya_types::{ApiEnvelope, StructuredReply};

/// The operations a conversation front-end drives
///
/// Futures are not `Send`: the client lives on a single UI thread and never
/// runs two exchanges at once.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// Liveness probe against the backend
    async fn health_check(&self) -> Result<(), ClientError>;

    /// Send one user turn and return the bot's structured reply
    async fn send_message(&self, text: &str) -> Result<StructuredReply, ClientError>;

    /// Ask the backend to drop the current conversation and start a new session
    async fn reset_session(&self) -> Result<ApiEnvelope, ClientError>;
}

#[async_trait(?Send)]
impl ChatBackend for SessionClient {
    async fn health_check(&self) -> Result<(), ClientError> {
        SessionClient::health_check(self).await
    }

    async fn send_message(&self, text: &str) -> Result<StructuredReply, ClientError> {
        SessionClient::send_message(self, text).await
    }

    async fn reset_session(&self) -> Result<ApiEnvelope, ClientError> {
        SessionClient::reset_session(self).await
    }
}
