//! Error types shared by every R2 operation

use aws_sdk_s3::error::DisplayErrorContext;

/// Failure of a client operation.
#[derive(Debug, thiserror::Error)]
pub enum R2Error {
    /// Local configuration is missing or unreadable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any remote-call failure: auth, network, not-found
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local filesystem failure during upload or download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned action was aborted or panicked before it produced a result
    #[error("Task error: {0}")]
    Task(String),
}

pub type R2Result<T> = Result<T, R2Error>;

impl R2Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Wrap an SDK error, keeping its whole cause chain in the message.
    pub fn from_sdk<E: std::error::Error>(context: &str, err: E) -> Self {
        Self::Transport(format!("{}: {}", context, DisplayErrorContext(err)))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<serde_json::Error> for R2Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("invalid config: {}", err))
    }
}
