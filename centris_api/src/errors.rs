//! Error types for the portal client.

/// Errors that can occur when talking to the portal backend.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The backend returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The session-lock handshake failed, or the backend kept rejecting the
    /// token after a refresh.
    #[error("Handshake failed: {reason}")]
    Handshake { reason: String },
    /// The session was closed and can no longer issue requests.
    #[error("Session is closed")]
    SessionClosed,
    /// A query violated a build-time invariant.
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },
}

impl Error {
    /// True for failures of the transport itself rather than of the session
    /// or the query. Callers use this to decide between truncating a result
    /// stream and aborting it.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::RequestFailed | Error::HttpStatus { .. })
    }
}
