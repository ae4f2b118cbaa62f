use reqwest::StatusCode;
use thiserror::Error;

/// Client-side failure taxonomy.
///
/// `Unauthorized` means the inbound stage has already torn the session down;
/// callers observing it need no cleanup of their own. Everything else is a
/// local failure for contextual display and leaves the session intact.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated")]
    Unauthorized,

    /// The server rejected a login attempt; carries the user-facing message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("Token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}
