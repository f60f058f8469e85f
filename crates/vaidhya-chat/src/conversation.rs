use vaidhya_client::ChatBackend;
use vaidhya_types::Message;

use crate::state::Rejection;
use crate::view::ConversationView;

/// A `ConversationView` driven by an injected backend
///
/// Each call runs one begin/await/finish cycle, so the view is never left
/// `Busy` after a call returns.
pub struct Conversation<B: ChatBackend> {
    backend: B,
    view: ConversationView,
}

impl<B: ChatBackend> Conversation<B> {
    pub fn new(backend: B) -> Self {
        Self::with_view(backend, ConversationView::new())
    }

    pub fn with_view(backend: B, view: ConversationView) -> Self {
        Self { backend, view }
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Probe the backend once and settle the initial state
    pub async fn start(&mut self) -> Result<&Message, Rejection> {
        if self.view.is_connected() || !self.view.messages().is_empty() {
            return Err(Rejection::AlreadyStarted);
        }
        let health = self.backend.health_check().await;
        self.view.finish_startup(health)
    }

    /// Send typed input; returns the bot reply or the system notice
    pub async fn send(&mut self, input: &str) -> Result<&Message, Rejection> {
        let text = self.view.begin_send(input)?;
        let outcome = self.backend.send_message(&text).await;
        self.view.finish_send(outcome)
    }

    /// Activate button `index` of transcript entry `message_id`
    pub async fn quick_reply(&mut self, message_id: u64, index: usize) -> Result<&Message, Rejection> {
        let value = self.view.begin_quick_reply(message_id, index)?;
        let outcome = self.backend.send_message(&value).await;
        self.view.finish_send(outcome)
    }

    /// Start a fresh session; the transcript is cleared whatever the backend says
    pub async fn reset(&mut self) -> Result<&Message, Rejection> {
        self.view.begin_reset()?;
        let outcome = self.backend.reset_session().await;
        self.view.finish_reset(outcome)
    }
}
