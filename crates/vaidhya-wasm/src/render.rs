//! HTML for transcript entries
//!
//! Kept free of DOM calls so it can be checked natively.

use vaidhya_types::{Message, Sender};

use crate::markdown::render_markdown;
use crate::utils::{escape_html, plain_text_html};

pub const MESSAGE_ID_ATTR: &str = "data-message-id";
pub const BUTTON_INDEX_ATTR: &str = "data-button-index";

/// Body HTML for a message: Markdown for the bot, escaped text otherwise
pub fn message_content_html(message: &Message) -> String {
    match message.sender {
        Sender::Bot => render_markdown(&message.text),
        Sender::User | Sender::System => plain_text_html(&message.text),
    }
}

/// Full HTML for one transcript entry
///
/// Quick-reply buttons are rendered disabled unless `buttons_enabled`.
pub fn message_html(message: &Message, buttons_enabled: bool) -> String {
    let mut html = format!(
        r#"<div class="message {} {}" {}="{}">"#,
        message.sender,
        escape_html(message.kind.as_str()),
        MESSAGE_ID_ATTR,
        message.id
    );
    html.push_str(&format!(
        r#"<div class="message-content">{}</div>"#,
        message_content_html(message)
    ));

    if message.has_buttons() {
        html.push_str(r#"<div class="quick-replies">"#);
        for (index, button) in message.buttons.iter().enumerate() {
            html.push_str(&format!(
                r#"<button class="quick-reply" {}="{}" {}="{}"{}>{}</button>"#,
                MESSAGE_ID_ATTR,
                message.id,
                BUTTON_INDEX_ATTR,
                index,
                if buttons_enabled { "" } else { " disabled" },
                escape_html(&button.text)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(&format!(
        r#"<div class="message-time">{}</div></div>"#,
        escape_html(&message.timestamp)
    ));
    html
}

/// Parse the data attributes of a clicked quick-reply button
pub fn parse_quick_reply_target(message_id: Option<String>, index: Option<String>) -> Option<(u64, usize)> {
    let message_id = message_id?.parse().ok()?;
    let index = index?.parse().ok()?;
    Some((message_id, index))
}
