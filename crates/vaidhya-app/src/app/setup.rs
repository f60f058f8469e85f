use anyhow::{Context, Result};
use std::path::PathBuf;
use std::rc::Rc;

use vaidhya_chat::{ConversationView, ViewCopy};
use vaidhya_client::{ClientConfig, FileStore, HttpTransport, ReqwestTransport, SessionClient};
use vaidhya_logging::{get_logs_dir, get_vaidhya_dir};

use crate::cli::Cli;
use crate::http_log::LoggingTransport;

const SESSION_FILE: &str = "session.json";

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_config: ClientConfig,
    pub state_file: PathBuf,
    /// Directory for HTTP dumps when `--log-http` is set
    pub http_log_dir: Option<PathBuf>,
    /// Replaces the built-in greeting when set
    pub welcome: Option<String>,
}

/// Set up application configuration from CLI arguments
///
/// Precedence for the backend URL: `--api-url` > `VAIDHYA_API_URL` (clap reads
/// both, including values loaded from `.env`) > built-in default.
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let client_config = ClientConfig::resolve(cli.api_url.clone());

    let state_file = match &cli.state_file {
        Some(path) => path.clone(),
        None => get_vaidhya_dir()?.join(SESSION_FILE),
    };

    let http_log_dir = if cli.log_http {
        Some(get_logs_dir().context("Failed to prepare HTTP log directory")?)
    } else {
        None
    };

    Ok(AppConfig {
        client_config,
        state_file,
        http_log_dir,
        welcome: cli.welcome.clone(),
    })
}

impl AppConfig {
    /// Fresh view carrying the configured greeting
    pub fn new_view(&self) -> ConversationView {
        match &self.welcome {
            Some(welcome) => ConversationView::with_copy(ViewCopy {
                welcome: welcome.clone(),
                ..ViewCopy::default()
            }),
            None => ConversationView::new(),
        }
    }

    /// Build the session client with file-backed session persistence
    pub fn build_client(&self) -> SessionClient {
        let reqwest: Rc<dyn HttpTransport> = Rc::new(ReqwestTransport::new());
        let transport: Rc<dyn HttpTransport> = match &self.http_log_dir {
            Some(dir) => Rc::new(LoggingTransport::new(reqwest, dir.clone())),
            None => reqwest,
        };

        SessionClient::new(
            self.client_config.clone(),
            transport,
            Rc::new(FileStore::new(self.state_file.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use vaidhya_client::ClientError;

    #[test]
    fn test_explicit_paths_are_used() {
        let cli = Cli::try_parse_from([
            "vaidhya",
            "--api-url",
            "http://clinic.local:5000/",
            "--state-file",
            "/tmp/vaidhya-test/session.json",
        ])
        .unwrap();
        let config = setup_from_cli(&cli).unwrap();
        assert_eq!(config.client_config.base_url, "http://clinic.local:5000");
        assert_eq!(config.state_file, PathBuf::from("/tmp/vaidhya-test/session.json"));
        assert!(config.http_log_dir.is_none());
        assert!(config.welcome.is_none());
    }

    #[test]
    fn test_welcome_flag_replaces_greeting() {
        let cli = Cli::try_parse_from([
            "vaidhya",
            "--state-file",
            "/tmp/vaidhya-test/session.json",
            "--welcome",
            "Namaste! How are you feeling today?",
        ])
        .unwrap();
        let config = setup_from_cli(&cli).unwrap();

        let mut view = config.new_view();
        let greeting = view.finish_startup(Ok(())).unwrap();
        assert_eq!(greeting.text, "Namaste! How are you feeling today?");

        let mut fallback = config.new_view();
        let notice = fallback.finish_startup(Err(ClientError::transport("connection refused"))).unwrap();
        assert_eq!(notice.text, vaidhya_chat::CONNECTION_FAILED_TEXT);
    }
}
