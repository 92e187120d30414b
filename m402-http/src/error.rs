//! Error types for the HTTP transport layer.

use m402::NegotiationError;

/// Errors returned by [`crate::client::X402Client`].
///
/// A 402 that cannot be paid is not an error: the caller receives a 402
/// response instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP request failed.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An offer was selected but the payment could not be created.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// The HTTP request body cannot be cloned (e.g., streaming).
    #[error("Request is not cloneable (streaming body?)")]
    RequestNotCloneable,

    /// The encoded payment is not a valid header value.
    #[error("Invalid payment header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

impl From<ClientError> for reqwest_middleware::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(e) => Self::Reqwest(e),
            other => Self::Middleware(other.into()),
        }
    }
}
