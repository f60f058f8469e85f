// Terminal front-end for the vaidhya medical assistant
pub mod app;
pub mod cli;
pub mod http_log;
pub mod render;

pub use cli::{Cli, Commands};
pub use http_log::LoggingTransport;
