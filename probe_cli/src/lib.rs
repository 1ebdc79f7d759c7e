pub mod app;
pub mod config;
pub mod logging;

pub use app::{build_client, build_request, conversation, run, RequestMode};
pub use config::{AppConfig, LogFormat, LoggingConfig};
