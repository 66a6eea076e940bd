//! Error types for pipeline-resource-core.

use thiserror::Error;

/// Errors surfaced by [`Connector`](crate::Connector) and
/// [`Directory`](crate::Directory) implementations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The server answered with a non-success status (bad credentials,
    /// unknown team, missing pipeline, ...).
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, connect, TLS handshake).
    #[error("transport error talking to {url}: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read or decoded.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Building the TLS connector failed.
    #[error("TLS setup failed: {0}")]
    Tls(String),
}

impl ConnectorError {
    /// Status code of a [`ConnectorError::Status`], if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
