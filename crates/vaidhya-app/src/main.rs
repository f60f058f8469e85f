use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use vaidhya::app::{run_command, run_message_mode, run_repl_mode, setup_from_cli};
use vaidhya::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    match vaidhya_logging::init(cli.verbose) {
        Ok(path) if cli.verbose => {
            println!("{}", format!("📝 Logging to {}", path.display()).bright_blue())
        }
        Ok(_) => {}
        Err(e) => eprintln!("{} Logging disabled: {:#}", "⚠️".yellow(), e),
    }

    let app_config = setup_from_cli(&cli)?;
    log::info!(
        "starting (backend={}, state_file={}, log_http={})",
        app_config.client_config.base_url,
        app_config.state_file.display(),
        cli.log_http
    );
    let client = app_config.build_client();

    if let Some(ref command) = cli.command {
        return run_command(command, &client).await;
    }

    if let Some(text) = cli.message.as_deref() {
        return run_message_mode(&app_config, client, text).await;
    }

    run_repl_mode(&app_config, client).await
}
