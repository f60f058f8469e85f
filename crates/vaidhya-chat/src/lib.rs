//! Conversation state for vaidhya front-ends
//!
//! `ConversationView` is the synchronous state machine (transcript plus the
//! Disconnected / Idle / Busy states). `Conversation` pairs it with an
//! injected `ChatBackend` for front-ends that can simply `await` each call.

pub mod conversation;
pub mod state;
pub mod view;

pub use conversation::Conversation;
pub use state::{Rejection, ViewState};
pub use view::{ConversationView, ViewCopy, APOLOGY_TEXT, CONNECTION_FAILED_TEXT, WELCOME_TEXT};
