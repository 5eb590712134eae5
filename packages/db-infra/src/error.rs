use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    /// `target` is always a sanitized URL.
    #[error("{message} ({target})")]
    Connect { target: String, message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        DbInfraError::Config {
            message: message.into(),
        }
    }
}
