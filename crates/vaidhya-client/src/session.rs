//! The session client: identity management plus the three backend calls

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use vaidhya_types::{
    ApiEnvelope, ChatRequest, HealthStatus, ResetRequest, SessionId, StructuredReply, CHAT_PATH,
    HEALTH_PATH, RESET_PATH, SESSION_ID_PREFIX, SESSION_STORAGE_KEY,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::store::KeyValueStore;
use crate::transport::{HttpResponse, HttpTransport};

/// Length of the random token inside a session id
const SESSION_TOKEN_LEN: usize = 9;

/// Build a fresh session identifier: prefix, random token, Unix millis
pub fn generate_session_id() -> SessionId {
    let token: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SESSION_TOKEN_LEN)
        .collect();
    format!(
        "{}{}_{}",
        SESSION_ID_PREFIX,
        token,
        Utc::now().timestamp_millis()
    )
}

/// Client for one persisted conversation with the backend
///
/// The session id is resolved lazily (stored value first, otherwise a new
/// one is generated and persisted) and then cached, so it stays stable for
/// the client's lifetime even when the store refuses writes. Only
/// `reset_session` replaces it.
pub struct SessionClient {
    config: ClientConfig,
    transport: Rc<dyn HttpTransport>,
    store: Rc<dyn KeyValueStore>,
    session_id: RefCell<Option<SessionId>>,
}

impl SessionClient {
    pub fn new(
        config: ClientConfig,
        transport: Rc<dyn HttpTransport>,
        store: Rc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            session_id: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current session id, creating and persisting one if none exists
    pub fn ensure_session_id(&self) -> SessionId {
        if let Some(id) = self.session_id.borrow().clone() {
            return id;
        }

        let id = match self.store.get(SESSION_STORAGE_KEY) {
            Some(stored) if !stored.trim().is_empty() => {
                debug!("restored session id {}", stored);
                stored
            }
            _ => {
                let fresh = generate_session_id();
                self.persist(&fresh);
                info!("created session id {}", fresh);
                fresh
            }
        };

        *self.session_id.borrow_mut() = Some(id.clone());
        id
    }

    /// Send one user turn; no retries
    pub async fn send_message(&self, text: &str) -> Result<StructuredReply, ClientError> {
        let session_id = self.ensure_session_id();
        let request = ChatRequest {
            message: text.to_string(),
            session_id: session_id.clone(),
        };
        debug!(
            "sending chat turn (session_id={}, message_len={})",
            session_id,
            text.len()
        );

        let envelope = self.post(CHAT_PATH, &request).await?;
        let envelope = require_success(envelope)?;

        if let Some(echoed) = envelope.session_id.as_deref() {
            if echoed != session_id {
                warn!(
                    "backend answered for session {} while client holds {}",
                    echoed, session_id
                );
            }
        }

        let response = envelope
            .response
            .ok_or_else(|| ClientError::protocol("reply is missing the `response` field"))?;
        serde_json::from_value::<StructuredReply>(response)
            .map_err(|e| ClientError::protocol(format!("`response` is not a structured reply: {}", e)))
    }

    /// Reset the remote conversation, then advance the local session id
    ///
    /// The new id is generated and persisted whatever the outcome of the
    /// remote call, which is still reported to the caller.
    pub async fn reset_session(&self) -> Result<ApiEnvelope, ClientError> {
        let previous = self.ensure_session_id();
        let request = ResetRequest {
            session_id: previous.clone(),
        };
        let result = match self.post(RESET_PATH, &request).await {
            Ok(envelope) => require_success(envelope),
            Err(e) => Err(e),
        };

        let fresh = generate_session_id();
        self.persist(&fresh);
        *self.session_id.borrow_mut() = Some(fresh.clone());
        info!("session reset ({} -> {})", previous, fresh);

        if let Err(e) = &result {
            error!("remote reset of session {} failed: {}", previous, e);
        }
        result
    }

    /// Liveness probe; any 2xx is healthy
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = self.config.endpoint(HEALTH_PATH);
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(ClientError::http_status(response.status, &response.body));
        }

        match serde_json::from_str::<HealthStatus>(&response.body) {
            Ok(health) => debug!(
                "backend healthy (service={}, status={})",
                health.service.as_deref().unwrap_or("unknown"),
                health.status.as_deref().unwrap_or("unknown")
            ),
            Err(_) => debug!("backend healthy (HTTP {})", response.status),
        }
        Ok(())
    }

    async fn post<T: Serialize>(&self, path: &str, request: &T) -> Result<ApiEnvelope, ClientError> {
        let url = self.config.endpoint(path);
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::transport(format!("failed to encode request: {}", e)))?;
        let response = self.transport.post_json(&url, &body).await?;
        parse_envelope(response)
    }

    fn persist(&self, id: &str) {
        if let Err(e) = self.store.set(SESSION_STORAGE_KEY, id) {
            warn!("failed to persist session id {}: {}", id, e);
        }
    }
}

fn parse_envelope(response: HttpResponse) -> Result<ApiEnvelope, ClientError> {
    if !response.is_success() {
        return Err(ClientError::http_status(response.status, &response.body));
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|e| ClientError::Transport {
        status: Some(response.status),
        message: format!("malformed response body: {}", e),
    })?;

    serde_json::from_value(value)
        .map_err(|e| ClientError::protocol(format!("reply is not a response envelope: {}", e)))
}

fn require_success(envelope: ApiEnvelope) -> Result<ApiEnvelope, ClientError> {
    if envelope.is_success() {
        return Ok(envelope);
    }
    let detail = envelope
        .error
        .as_deref()
        .or(envelope.message.as_deref())
        .unwrap_or("no detail");
    Err(ClientError::protocol(format!(
        "backend reported status {:?}: {}",
        envelope.status.as_deref().unwrap_or("<missing>"),
        detail
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportFailure;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Scripted transport recording every request it sees
    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportFailure>>>,
        requests: RefCell<Vec<(String, Option<Value>)>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: Value) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body.to_string())));
            self
        }

        fn raw(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportFailure::new(message)));
            self
        }

        fn next(&self) -> Result<HttpResponse, TransportFailure> {
            self.replies
                .borrow_mut()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportFailure> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), Some(body.clone())));
            self.next()
        }

        async fn get(&self, url: &str) -> Result<HttpResponse, TransportFailure> {
            self.requests.borrow_mut().push((url.to_string(), None));
            self.next()
        }
    }

    fn client_with(transport: ScriptedTransport) -> (SessionClient, Rc<ScriptedTransport>, Rc<MemoryStore>) {
        let transport = Rc::new(transport);
        let store = Rc::new(MemoryStore::new());
        let client = SessionClient::new(
            ClientConfig::new("http://backend.test"),
            transport.clone(),
            store.clone(),
        );
        (client, transport, store)
    }

    fn success(response: Value) -> Value {
        json!({ "status": "success", "response": response })
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_session_id();
        assert!(id.starts_with("session_"));
        let parts: Vec<&str> = id.trim_start_matches("session_").split('_').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 9);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_ensure_session_id_is_idempotent_and_persisted() {
        let (client, _, store) = client_with(ScriptedTransport::default());
        let first = client.ensure_session_id();
        let second = client.ensure_session_id();
        assert_eq!(first, second);
        assert_eq!(store.get(SESSION_STORAGE_KEY), Some(first));
    }

    #[test]
    fn test_ensure_session_id_reuses_stored_value() {
        let store = Rc::new(MemoryStore::with_value(SESSION_STORAGE_KEY, "session_prev_42"));
        let client = SessionClient::new(
            ClientConfig::default(),
            Rc::new(ScriptedTransport::default()),
            store,
        );
        assert_eq!(client.ensure_session_id(), "session_prev_42");
        assert_eq!(client.ensure_session_id(), "session_prev_42");
    }

    #[tokio::test]
    async fn test_send_message_posts_text_and_session() {
        let (client, transport, _) = client_with(ScriptedTransport::default().reply(
            200,
            success(json!({ "text": "Hi!", "type": "message", "buttons": [] })),
        ));

        let reply = client.send_message("hello").await.unwrap();
        assert_eq!(reply, StructuredReply::text("Hi!").with_kind(vaidhya_types::MessageKind::Message));

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].0, "http://backend.test/api/chat");
        assert_eq!(
            requests[0].1,
            Some(json!({ "message": "hello", "session_id": client.ensure_session_id() }))
        );
    }

    #[tokio::test]
    async fn test_missing_response_is_protocol_error() {
        let (client, _, _) =
            client_with(ScriptedTransport::default().reply(200, json!({ "status": "success" })));
        let err = client.send_message("hello").await.unwrap_err();
        assert!(err.is_protocol(), "{err}");
    }

    #[tokio::test]
    async fn test_error_status_is_protocol_error() {
        let (client, _, _) = client_with(
            ScriptedTransport::default().reply(200, json!({ "status": "error", "error": "boom" })),
        );
        let err = client.send_message("hello").await.unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_unusable_response_payload_is_protocol_error() {
        let (client, _, _) = client_with(
            ScriptedTransport::default().reply(200, success(json!({ "type": "message" }))),
        );
        assert!(client.send_message("hello").await.unwrap_err().is_protocol());
    }

    #[tokio::test]
    async fn test_non_object_json_is_protocol_error() {
        let (client, _, _) = client_with(ScriptedTransport::default().reply(200, json!([1, 2, 3])));
        assert!(client.send_message("hello").await.unwrap_err().is_protocol());
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let (client, _, _) = client_with(ScriptedTransport::default().raw(200, "<html>oops</html>"));
        let err = client.send_message("hello").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let (client, _, _) = client_with(
            ScriptedTransport::default().reply(500, json!({ "status": "error", "error": "db down" })),
        );
        let err = client.send_message("hello").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("db down"));
    }

    #[tokio::test]
    async fn test_network_failure_is_transport_error() {
        let (client, _, _) = client_with(ScriptedTransport::default().fail("connection refused"));
        let err = client.send_message("hello").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_reset_sends_old_id_and_advances() {
        let (client, transport, store) = client_with(
            ScriptedTransport::default()
                .reply(200, json!({ "status": "success", "message": "Session reset successfully" })),
        );
        let before = client.ensure_session_id();

        let envelope = client.reset_session().await.unwrap();
        assert!(envelope.is_success());

        let after = client.ensure_session_id();
        assert_ne!(before, after);
        assert_eq!(store.get(SESSION_STORAGE_KEY), Some(after));
        assert_eq!(
            transport.requests.borrow()[0].1,
            Some(json!({ "session_id": before }))
        );
    }

    #[tokio::test]
    async fn test_reset_advances_even_when_remote_fails() {
        let (client, _, store) = client_with(ScriptedTransport::default().fail("connection reset"));
        let before = client.ensure_session_id();

        let err = client.reset_session().await.unwrap_err();
        assert!(err.is_transport());

        let after = client.ensure_session_id();
        assert_ne!(before, after);
        assert_eq!(store.get(SESSION_STORAGE_KEY), Some(after));
    }

    #[tokio::test]
    async fn test_health_check_statuses() {
        let (client, transport, _) = client_with(
            ScriptedTransport::default()
                .reply(200, json!({ "status": "healthy", "service": "medical-bot-backend" }))
                .raw(204, "")
                .raw(503, "maintenance"),
        );

        assert!(client.health_check().await.is_ok());
        assert!(client.health_check().await.is_ok());
        let err = client.health_check().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(transport.requests.borrow()[0].0, "http://backend.test/health");
    }
}
