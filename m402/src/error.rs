//! Error types for the x402 payment client.
//!
//! Only failures that must reach the caller are errors here. A malformed 402
//! body or an offer list with nothing acceptable is not an error: negotiation
//! returns `None` and the transport layer answers with a 402 of its own.

use crate::wallet::WalletError;

/// A transport header failed to encode or decode.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The header value is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The selected offer could not be turned into a proven payment.
///
/// The cause is either what the wallet reported (insufficient funds, unknown
/// account, proving timeout, node unreachable) or an offer the prove step
/// cannot pay: an [`UnsupportedSchemeError`](crate::scheme::UnsupportedSchemeError)
/// or an [`InvalidAmountError`](crate::amount::InvalidAmountError). In the
/// latter two cases the wallet is not called. Never retried by this crate.
#[derive(Debug, thiserror::Error)]
#[error("Failed to create payment proof: {source}")]
pub struct ProofCreationError {
    #[source]
    source: WalletError,
}

impl ProofCreationError {
    /// Wraps the cause of the failure.
    #[must_use]
    pub fn new(source: impl Into<WalletError>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns the underlying cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.source
    }

    /// Returns the cause as `E` if it has that type.
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    /// Consumes the error, returning the underlying cause.
    #[must_use]
    pub fn into_cause(self) -> WalletError {
        self.source
    }
}

/// Errors that abort a negotiation after an offer has been selected.
#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    /// The selected offer could not be proven.
    #[error(transparent)]
    ProofCreation(#[from] ProofCreationError),

    /// The payment payload could not be encoded.
    #[error("Failed to encode payment payload: {0}")]
    Codec(#[from] CodecError),
}
