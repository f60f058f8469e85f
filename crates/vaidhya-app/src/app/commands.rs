use anyhow::{bail, Result};
use colored::Colorize;

use vaidhya_client::SessionClient;

use crate::cli::Commands;

/// Run a one-off subcommand against the backend
pub async fn run_command(command: &Commands, client: &SessionClient) -> Result<()> {
    match command {
        Commands::Health => match client.health_check().await {
            Ok(()) => {
                println!("{} Backend at {} is healthy", "✓".green(), client.config().base_url);
                Ok(())
            }
            Err(e) => bail!("Backend at {} is unreachable: {}", client.config().base_url, e),
        },
        Commands::Session => {
            println!("{}", client.ensure_session_id());
            Ok(())
        }
        Commands::Reset => {
            let outcome = client.reset_session().await;
            let session_id = client.ensure_session_id();
            match outcome {
                Ok(_) => println!("{} New session {}", "✓".green(), session_id),
                Err(e) => {
                    eprintln!("{} Backend reset failed: {}", "⚠️".yellow(), e);
                    println!("Local session moved to {}", session_id);
                }
            }
            Ok(())
        }
    }
}
