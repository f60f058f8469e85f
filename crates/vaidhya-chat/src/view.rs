use chrono::Local;
use log::{debug, error};

use vaidhya_client::ClientError;
use vaidhya_types::{Message, MessageKind, QuickReply, Sender, StructuredReply};

use crate::state::{Rejection, ViewState};

pub const WELCOME_TEXT: &str = "Hello! I'm your medical assistant. Tell me how you're feeling and I'll help you figure out the next step.";
pub const APOLOGY_TEXT: &str = "Sorry, I'm having trouble responding right now. Please try again.";
pub const CONNECTION_FAILED_TEXT: &str = "Unable to connect to the server. Please check your connection and reload the page.";

/// User-facing strings a front-end may override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCopy {
    pub welcome: String,
    pub apology: String,
    pub connection_failed: String,
}

impl Default for ViewCopy {
    fn default() -> Self {
        Self {
            welcome: WELCOME_TEXT.to_string(),
            apology: APOLOGY_TEXT.to_string(),
            connection_failed: CONNECTION_FAILED_TEXT.to_string(),
        }
    }
}

/// Call a `Busy` view is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Send,
    Reset,
}

/// Transcript plus the three-state connectivity machine
///
/// Every network-bound action is split into `begin_*` (validates, updates the
/// transcript, enters `Busy`) and `finish_*` (applies the outcome, returns to
/// `Idle`), so a UI never has to hold the view across an await point. A
/// `finish_*` only completes the `begin_*` of the same kind.
#[derive(Debug)]
pub struct ConversationView {
    state: ViewState,
    pending: Option<Pending>,
    messages: Vec<Message>,
    next_id: u64,
    copy: ViewCopy,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    pub fn new() -> Self {
        Self::with_copy(ViewCopy::default())
    }

    pub fn with_copy(copy: ViewCopy) -> Self {
        Self {
            state: ViewState::Disconnected,
            pending: None,
            messages: Vec::new(),
            next_id: 1,
            copy,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn is_busy(&self) -> bool {
        self.state == ViewState::Busy
    }

    /// Whether input controls (text box, send, quick replies) are enabled
    pub fn can_send(&self) -> bool {
        self.state == ViewState::Idle
    }

    /// Whether the reset control is enabled
    pub fn can_reset(&self) -> bool {
        self.state != ViewState::Busy
    }

    /// Buttons of the newest entry, if it offers any
    pub fn latest_quick_replies(&self) -> Option<(u64, &[QuickReply])> {
        self.messages
            .last()
            .filter(|m| m.has_buttons())
            .map(|m| (m.id, m.buttons.as_slice()))
    }

    /// Apply the startup health check
    pub fn finish_startup(&mut self, health: Result<(), ClientError>) -> Result<&Message, Rejection> {
        if self.state != ViewState::Disconnected || !self.messages.is_empty() {
            return Err(Rejection::AlreadyStarted);
        }

        match health {
            Ok(()) => {
                self.state = ViewState::Idle;
                let welcome = self.copy.welcome.clone();
                Ok(self.push(Sender::Bot, welcome, MessageKind::Message, Vec::new()))
            }
            Err(e) => {
                error!("backend health check failed: {}", e);
                let notice = self.copy.connection_failed.clone();
                Ok(self.push(Sender::System, notice, MessageKind::Error, Vec::new()))
            }
        }
    }

    /// Validate typed input, append it and enter `Busy`
    ///
    /// Returns the text to hand to the backend.
    pub fn begin_send(&mut self, input: &str) -> Result<String, Rejection> {
        self.ensure_idle()?;
        let text = input.trim();
        if text.is_empty() {
            return Err(Rejection::EmptyInput);
        }
        Ok(self.submit(text.to_string()))
    }

    /// Same as typing the button's value; the value is sent verbatim
    pub fn begin_quick_reply(&mut self, message_id: u64, index: usize) -> Result<String, Rejection> {
        self.ensure_idle()?;
        let value = self
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .and_then(|m| m.buttons.get(index))
            .map(|b| b.value.clone())
            .ok_or(Rejection::UnknownQuickReply)?;
        if value.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }
        Ok(self.submit(value))
    }

    /// Apply the outcome of a chat exchange and return to `Idle`
    pub fn finish_send(
        &mut self,
        outcome: Result<StructuredReply, ClientError>,
    ) -> Result<&Message, Rejection> {
        self.complete(Pending::Send)?;

        match outcome {
            Ok(reply) => {
                let kind = reply.kind.unwrap_or_default();
                Ok(self.push(Sender::Bot, reply.text, kind, reply.buttons))
            }
            Err(e) => {
                error!("chat exchange failed: {}", e);
                let apology = self.copy.apology.clone();
                Ok(self.push(Sender::System, apology, MessageKind::Error, Vec::new()))
            }
        }
    }

    /// Enter `Busy` ahead of a session reset; allowed while disconnected
    pub fn begin_reset(&mut self) -> Result<(), Rejection> {
        if self.state == ViewState::Busy {
            return Err(Rejection::Busy);
        }
        self.enter_busy(Pending::Reset);
        Ok(())
    }

    /// Clear the transcript and seed the welcome entry, whatever the outcome
    pub fn finish_reset<T>(&mut self, outcome: Result<T, ClientError>) -> Result<&Message, Rejection> {
        self.complete(Pending::Reset)?;
        if let Err(e) = outcome {
            error!("session reset failed remotely: {}", e);
        }

        self.messages.clear();
        let welcome = self.copy.welcome.clone();
        Ok(self.push(Sender::Bot, welcome, MessageKind::Message, Vec::new()))
    }

    fn ensure_idle(&self) -> Result<(), Rejection> {
        match self.state {
            ViewState::Idle => Ok(()),
            ViewState::Busy => Err(Rejection::Busy),
            ViewState::Disconnected => Err(Rejection::Disconnected),
        }
    }

    fn enter_busy(&mut self, pending: Pending) {
        self.state = ViewState::Busy;
        self.pending = Some(pending);
    }

    /// Leave `Busy` if it was entered for `expected`
    fn complete(&mut self, expected: Pending) -> Result<(), Rejection> {
        if self.state != ViewState::Busy || self.pending != Some(expected) {
            return Err(Rejection::NotBusy);
        }
        self.pending = None;
        self.state = ViewState::Idle;
        Ok(())
    }

    fn submit(&mut self, text: String) -> String {
        self.push(Sender::User, text.clone(), MessageKind::Message, Vec::new());
        self.enter_busy(Pending::Send);
        debug!("sending user turn ({} chars)", text.chars().count());
        text
    }

    fn push(
        &mut self,
        sender: Sender,
        text: String,
        kind: MessageKind,
        buttons: Vec<QuickReply>,
    ) -> &Message {
        let message = Message {
            id: self.next_id,
            sender,
            text,
            kind,
            buttons,
            timestamp: Local::now().format("%H:%M").to_string(),
        };
        self.next_id += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
