use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Configuration missing: {0} is required")]
    ConfigurationMissing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Azure OpenAI API error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("Malformed result: {0}")]
    MalformedResult(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
