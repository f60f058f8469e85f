use thiserror::Error;

/// Connectivity and activity of a conversation view
///
/// `Busy` always returns to `Idle` once the in-flight call resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Disconnected,
    Idle,
    Busy,
}

impl ViewState {
    pub fn is_connected(&self) -> bool {
        !matches!(self, ViewState::Disconnected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Disconnected => "Disconnected",
            ViewState::Idle => "Connected",
            ViewState::Busy => "Thinking...",
        }
    }
}

/// Why a user action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("message is empty")]
    EmptyInput,

    #[error("a request is already in flight")]
    Busy,

    #[error("not connected to the backend")]
    Disconnected,

    #[error("no such quick reply")]
    UnknownQuickReply,

    #[error("startup has already completed")]
    AlreadyStarted,

    #[error("no matching request is in flight")]
    NotBusy,
}
