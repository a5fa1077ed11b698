use thiserror::Error;

/// Errors surfaced by the remote client. Exactly two failure kinds are
/// distinguished at this boundary: the request never produced a usable
/// response (`Transport`), or the server answered with an error status
/// (`Status`). Nothing is retried here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connect, DNS, timeout, body read, or decode failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server responded with a non-success status code.
    #[error("server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// A lookup answered an empty meal list for the requested id.
    #[error("meal {0} not found")]
    NotFound(String),
}
