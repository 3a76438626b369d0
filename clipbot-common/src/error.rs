// ================================================================
// File: clipbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a command: {0}")]
    NotACommand(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True for failures of the outbound request path (network, HTTP status,
    /// payload decoding, missing credentials). These abort a clip scan.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Json(_) | Error::Platform(_) | Error::Auth(_)
        )
    }
}
