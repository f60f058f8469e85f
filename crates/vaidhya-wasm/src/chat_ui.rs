use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

use vaidhya_chat::{ConversationView, Rejection, ViewState};
use vaidhya_types::Message;
use vaidhya_client::SessionClient;

use crate::dom;
use crate::render::{self, BUTTON_INDEX_ATTR, MESSAGE_ID_ATTR};

const MESSAGES_ID: &str = "messagesContainer";
const INPUT_ID: &str = "messageInput";
const SEND_ID: &str = "sendButton";
const RESET_ID: &str = "resetButton";
const STATUS_ID: &str = "connectionStatus";
const TYPING_ID: &str = "typingIndicator";

/// The chat widget bound to the page's DOM
///
/// Cheap to clone; every handler works on the same view and client. The view
/// is only borrowed between awaits, never across one.
#[derive(Clone)]
pub struct ChatWidget {
    document: Document,
    view: Rc<RefCell<ConversationView>>,
    client: Rc<SessionClient>,
}

impl ChatWidget {
    pub fn new(document: Document, client: SessionClient) -> Self {
        Self {
            document,
            view: Rc::new(RefCell::new(ConversationView::new())),
            client: Rc::new(client),
        }
    }

    pub async fn start(self) -> Result<(), JsValue> {
        self.setup_input_handlers()?;
        self.setup_reset_button()?;
        self.setup_quick_replies()?;
        self.render()?;

        log::info!("Session {}", self.client.ensure_session_id());
        let health = self.client.health_check().await;
        settle("Startup", self.view.borrow_mut().finish_startup(health));
        self.render()
    }

    fn setup_input_handlers(&self) -> Result<(), JsValue> {
        let send_btn = dom::get_element_by_id(&self.document, SEND_ID)?;
        let widget = self.clone();
        dom::add_event_listener(&send_btn, "click", move |_: MouseEvent| {
            widget.spawn_send();
        })?;

        // Enter sends, Shift+Enter inserts a newline
        let input = dom::get_textarea_by_id(&self.document, INPUT_ID)?;
        let widget = self.clone();
        dom::add_event_listener(&input, "keydown", move |event: KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                widget.spawn_send();
            }
        })?;

        Ok(())
    }

    fn setup_reset_button(&self) -> Result<(), JsValue> {
        let reset_btn = dom::get_element_by_id(&self.document, RESET_ID)?;
        let widget = self.clone();
        dom::add_event_listener(&reset_btn, "click", move |_: MouseEvent| {
            let widget = widget.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = widget.reset().await {
                    log::error!("Failed to reset conversation: {:?}", e);
                }
            });
        })?;
        Ok(())
    }

    /// One delegated listener for every quick-reply button in the transcript
    fn setup_quick_replies(&self) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, MESSAGES_ID)?;
        let widget = self.clone();
        dom::add_event_listener(&container, "click", move |event: MouseEvent| {
            let Some(button) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(&format!("[{}]", BUTTON_INDEX_ATTR)).ok().flatten())
            else {
                return;
            };

            let Some((message_id, index)) = render::parse_quick_reply_target(
                button.get_attribute(MESSAGE_ID_ATTR),
                button.get_attribute(BUTTON_INDEX_ATTR),
            ) else {
                log::warn!("Quick reply button without a valid target");
                return;
            };

            let widget = widget.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = widget.quick_reply(message_id, index).await {
                    log::error!("Failed to send quick reply: {:?}", e);
                }
            });
        })?;
        Ok(())
    }

    fn spawn_send(&self) {
        let widget = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = widget.send_from_input().await {
                log::error!("Failed to send message: {:?}", e);
            }
        });
    }

    async fn send_from_input(&self) -> Result<(), JsValue> {
        let input = dom::get_textarea_by_id(&self.document, INPUT_ID)?;
        let begun = self.view.borrow_mut().begin_send(&input.value());
        let text = match begun {
            Ok(text) => text,
            Err(rejection) => {
                log::debug!("Send refused: {}", rejection);
                return Ok(());
            }
        };

        input.set_value("");
        self.render()?;

        let outcome = self.client.send_message(&text).await;
        settle("Reply", self.view.borrow_mut().finish_send(outcome));
        self.render()
    }

    async fn quick_reply(&self, message_id: u64, index: usize) -> Result<(), JsValue> {
        let begun = self.view.borrow_mut().begin_quick_reply(message_id, index);
        let value = match begun {
            Ok(value) => value,
            Err(rejection) => {
                log::debug!("Quick reply refused: {}", rejection);
                return Ok(());
            }
        };
        self.render()?;

        let outcome = self.client.send_message(&value).await;
        settle("Reply", self.view.borrow_mut().finish_send(outcome));
        self.render()
    }

    async fn reset(&self) -> Result<(), JsValue> {
        let begun = self.view.borrow_mut().begin_reset();
        if let Err(rejection) = begun {
            log::debug!("Reset refused: {}", rejection);
            return Ok(());
        }
        self.render()?;

        let outcome = self.client.reset_session().await;
        settle("Reset", self.view.borrow_mut().finish_reset(outcome));
        log::info!("New session {}", self.client.ensure_session_id());
        self.render()
    }

    /// Redraw everything from the view
    fn render(&self) -> Result<(), JsValue> {
        let view = self.view.borrow();
        let can_send = view.can_send();

        let container = dom::get_element_by_id(&self.document, MESSAGES_ID)?;
        let html: String = view
            .messages()
            .iter()
            .map(|message| render::message_html(message, can_send))
            .collect();
        container.set_inner_html(&html);
        dom::scroll_to_bottom(&container);

        let status = dom::get_element_by_id(&self.document, STATUS_ID)?;
        status.set_text_content(Some(view.state().label()));
        status.set_class_name(match view.state() {
            ViewState::Disconnected => "status disconnected",
            ViewState::Idle => "status connected",
            ViewState::Busy => "status busy",
        });

        let typing = dom::get_html_element_by_id(&self.document, TYPING_ID)?;
        if view.is_busy() {
            dom::show_element(&typing);
        } else {
            dom::hide_element(&typing);
        }

        let input = dom::get_textarea_by_id(&self.document, INPUT_ID)?;
        input.set_disabled(!can_send);
        dom::get_button_by_id(&self.document, SEND_ID)?.set_disabled(!can_send);
        dom::get_button_by_id(&self.document, RESET_ID)?.set_disabled(!view.can_reset());

        if can_send {
            let _ = input.focus();
        }

        Ok(())
    }
}

/// Log a `finish_*` the view refused; returns whether it was applied
fn settle(action: &str, outcome: Result<&Message, Rejection>) -> bool {
    match outcome {
        Ok(message) => {
            log::debug!("{} applied as message {}", action, message.id);
            true
        }
        Err(rejection) => {
            log::warn!("{} ignored: {}", action, rejection);
            false
        }
    }
}
