use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use vaidhya_chat::{Conversation, Rejection};
use vaidhya_client::SessionClient;

use crate::app::AppConfig;
use crate::render::{format_message, prompt};

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Quit,
    Help,
    Reset,
    /// 1-based button number on the latest bot message
    QuickReply(usize),
    Send(String),
}

/// Classify a line typed at the prompt
pub fn parse_repl_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    match trimmed {
        "" => ReplInput::Empty,
        "exit" | "quit" | "/quit" | "/exit" => ReplInput::Quit,
        "/help" | "?" => ReplInput::Help,
        "/reset" => ReplInput::Reset,
        _ => match trimmed.strip_prefix('#').map(|n| n.trim().parse::<usize>()) {
            Some(Ok(number)) if number > 0 => ReplInput::QuickReply(number),
            _ => ReplInput::Send(line.to_string()),
        },
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  #N        - Choose option N of the latest question");
    println!("  /reset    - Start a new conversation");
    println!("  /help     - Show this help");
    println!("  /quit     - Exit (also 'exit' or 'quit')");
}

fn explain(rejection: Rejection) {
    match rejection {
        Rejection::Disconnected => eprintln!(
            "{} Not connected to the assistant. Type /reset to try again.",
            "❌".bright_red()
        ),
        Rejection::UnknownQuickReply => {
            eprintln!("{} No such option on the latest message", "❌".bright_red())
        }
        other => log::debug!("Input refused: {}", other),
    }
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: &AppConfig, client: SessionClient) -> Result<()> {
    println!("{}", "🩺 Vaidhya - medical assistant".bright_cyan().bold());
    println!(
        "{}",
        format!("Backend: {}", config.client_config.base_url).bright_black()
    );
    println!(
        "{}",
        format!("Session: {}", client.ensure_session_id()).bright_black()
    );
    println!(
        "{}",
        "Type /help for commands, 'exit' or 'quit' to exit\n".bright_black()
    );

    let mut conversation = Conversation::with_view(client, config.new_view());
    let startup = conversation.start().await?;
    println!("{}\n", format_message(startup));

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&prompt(conversation.view().state()));

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(e) => {
                eprintln!("{} Input error: {}", "❌".bright_red(), e);
                break;
            }
        };

        let input = parse_repl_input(&line);
        if !matches!(input, ReplInput::Empty) {
            let _ = rl.add_history_entry(line.trim());
        }

        let outcome = match input {
            ReplInput::Empty => continue,
            ReplInput::Quit => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            ReplInput::Help => {
                print_help();
                continue;
            }
            ReplInput::Reset => conversation.reset().await,
            ReplInput::QuickReply(number) => {
                let target = conversation
                    .view()
                    .latest_quick_replies()
                    .map(|(message_id, _)| message_id);
                match target {
                    Some(message_id) => conversation.quick_reply(message_id, number - 1).await,
                    None => Err(Rejection::UnknownQuickReply),
                }
            }
            ReplInput::Send(text) => conversation.send(&text).await,
        };

        match outcome {
            Ok(message) => println!("{}\n", format_message(message)),
            Err(rejection) => explain(rejection),
        }
    }

    Ok(())
}
