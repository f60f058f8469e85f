use colored::Colorize;

use vaidhya_chat::ViewState;
use vaidhya_types::{Message, MessageKind, Sender};

/// Terminal rendering of one transcript entry, buttons numbered from 1
pub fn format_message(message: &Message) -> String {
    let time = format!("[{}]", message.timestamp).bright_black();
    let badge = match message.sender {
        Sender::Bot => "Vaidhya:".bright_cyan().bold(),
        Sender::User => "You:".bright_green().bold(),
        Sender::System => "System:".bright_red().bold(),
    };

    let body = if message.kind.is_emergency() {
        format!("{}\n{}", "🚨 EMERGENCY".on_red().white().bold(), message.text.bright_red().bold())
    } else {
        match (&message.sender, &message.kind) {
            (Sender::System, _) | (_, MessageKind::Error) => message.text.red().to_string(),
            (_, MessageKind::Summary) => message.text.bright_white().to_string(),
            _ => message.text.clone(),
        }
    };

    let mut out = format!("{} {} {}", time, badge, body);
    for (index, button) in message.buttons.iter().enumerate() {
        out.push_str(&format!(
            "\n    {} {}",
            format!("#{}", index + 1).bright_yellow(),
            button.text
        ));
    }
    out
}

/// Prompt prefix reflecting the connection state
pub fn prompt(state: ViewState) -> String {
    let indicator = match state {
        ViewState::Disconnected => format!("[{}]", state.label()).bright_red(),
        ViewState::Idle | ViewState::Busy => format!("[{}]", state.label()).bright_magenta(),
    };
    format!("{} {} ", indicator, "You:".bright_green().bold())
}
