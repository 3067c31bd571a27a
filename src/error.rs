use thiserror::Error;

/// Errors raised while talking to the browser or decoding what the page returned
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("No active tab found")]
    NoActiveTab,

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Tab '{0}' not found")]
    TabNotFound(String),

    /// The page refused the injected script (e.g. internal browser pages)
    #[error("Script injection failed: {0}")]
    InjectionFailed(String),

    #[error("Failed to parse page content: {0}")]
    ContentParseFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Panel has shut down")]
    PanelClosed,
}

pub type Result<T> = std::result::Result<T, OutlineError>;
