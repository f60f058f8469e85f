use thiserror::Error;

/// Longest slice of a response body kept in an error message
const MAX_BODY_IN_ERROR: usize = 500;

/// Errors surfaced by `SessionClient`
///
/// There are exactly two kinds. `Transport` means the exchange could not be
/// completed (network failure, non-2xx status, body that is not JSON).
/// `Protocol` means the exchange completed but the reply cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Non-2xx reply; the body is kept (truncated) for diagnostics
    pub fn http_status(status: u16, body: &str) -> Self {
        ClientError::Transport {
            status: Some(status),
            message: truncate_body(body),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        ClientError::Protocol(message.into())
    }

    /// HTTP status of the failed exchange, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { status, .. } => *status,
            ClientError::Protocol(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }
}

impl From<TransportFailure> for ClientError {
    fn from(failure: TransportFailure) -> Self {
        ClientError::transport(failure.0)
    }
}

/// The transport could not complete the exchange at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors from a `KeyValueStore` write
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_BODY_IN_ERROR {
        body.to_string()
    } else {
        format!("{}...", body.chars().take(MAX_BODY_IN_ERROR).collect::<String>())
    }
}
