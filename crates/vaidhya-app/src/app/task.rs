use anyhow::{bail, Result};

use vaidhya_chat::Conversation;
use vaidhya_client::SessionClient;
use vaidhya_types::Sender;

use crate::app::AppConfig;
use crate::render::format_message;

/// Send a single message, print the reply and exit
///
/// Fails when the backend is unreachable or the exchange does not produce a
/// bot reply, so scripts can rely on the exit status.
pub async fn run_message_mode(config: &AppConfig, client: SessionClient, text: &str) -> Result<()> {
    let mut conversation = Conversation::with_view(client, config.new_view());

    conversation.start().await?;
    if !conversation.view().is_connected() {
        let notice = conversation
            .view()
            .last_message()
            .map(|m| m.text.clone())
            .unwrap_or_default();
        bail!("{} ({})", notice, conversation.backend().config().base_url);
    }

    let reply = conversation.send(text).await?;
    println!("{}", format_message(reply));
    if reply.sender != Sender::Bot {
        bail!("No reply from the assistant");
    }
    Ok(())
}
