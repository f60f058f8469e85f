pub mod commands;
pub mod repl;
pub mod setup;
pub mod task;

pub use commands::run_command;
pub use repl::{parse_repl_input, run_repl_mode, ReplInput};
pub use setup::{setup_from_cli, AppConfig};
pub use task::run_message_mode;
