use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session ID type (opaque, client-generated)
pub type SessionId = String;

/// Status value the backend uses for a completed exchange
pub const STATUS_SUCCESS: &str = "success";

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
}

/// Body of `POST /api/reset`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequest {
    pub session_id: SessionId,
}

/// Response envelope shared by `/api/chat` and `/api/reset`
///
/// Every field is optional: whether the envelope is usable is decided by the
/// client, so that shape problems surface as protocol errors rather than as
/// decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }
}

/// Body of `GET /health`; informational only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
