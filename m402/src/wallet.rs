//! The wallet capability consumed by the negotiator.
//!
//! Creating a payment on Miden means building a pay-to-id note, executing the
//! transaction locally and proving it. All of that lives in the wallet; this
//! crate only asks for the finished artifact through [`ProofCreator`].
//!
//! Implementations that cannot prove two transactions at once must serialize
//! calls themselves. The negotiator does not.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Error reported by a wallet. Opaque to this crate.
pub type WalletError = Box<dyn std::error::Error + Send + Sync>;

/// Visibility of the note carrying the payment.
///
/// Counterparties can only verify public notes, so x402 payments are always
/// created with [`NoteVisibility::Public`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteVisibility {
    /// Note details are published on chain.
    Public,
    /// Only a commitment to the note is published.
    Private,
}

impl NoteVisibility {
    /// Returns the lowercase name of the visibility.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for NoteVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proven payment transaction produced by a wallet.
///
/// Treated as an opaque blob: the artifact is forwarded without inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenPayment {
    /// Hex-encoded serialized proven transaction.
    pub proven_artifact_hex: String,
    /// Transaction identifier.
    pub transaction_id: String,
}

/// A wallet able to prove payments.
///
/// # Example
///
/// ```rust
/// use m402::amount::U256;
/// use m402::wallet::{NoteVisibility, ProofCreator, ProvenPayment, WalletError};
///
/// struct FixedWallet;
///
/// #[async_trait::async_trait]
/// impl ProofCreator for FixedWallet {
///     fn address(&self) -> &str {
///         "0xsender"
///     }
///
///     async fn create_proof(
///         &self,
///         _recipient: &str,
///         _asset: &str,
///         _amount: U256,
///         _visibility: NoteVisibility,
///     ) -> Result<ProvenPayment, WalletError> {
///         Ok(ProvenPayment {
///             proven_artifact_hex: "aabbccdd".into(),
///             transaction_id: "0x01".into(),
///         })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ProofCreator: Send + Sync {
    /// Account identifier of the payer, used as `from` in the payload.
    fn address(&self) -> &str;

    /// Builds, executes and proves a transfer of `amount` units of `asset`
    /// to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns the wallet's own error if the payment cannot be proven.
    async fn create_proof(
        &self,
        recipient: &str,
        asset: &str,
        amount: U256,
        visibility: NoteVisibility,
    ) -> Result<ProvenPayment, WalletError>;
}

#[async_trait::async_trait]
impl<T: ProofCreator + ?Sized> ProofCreator for Arc<T> {
    fn address(&self) -> &str {
        (**self).address()
    }

    async fn create_proof(
        &self,
        recipient: &str,
        asset: &str,
        amount: U256,
        visibility: NoteVisibility,
    ) -> Result<ProvenPayment, WalletError> {
        (**self)
            .create_proof(recipient, asset, amount, visibility)
            .await
    }
}

#[async_trait::async_trait]
impl<T: ProofCreator + ?Sized> ProofCreator for &T {
    fn address(&self) -> &str {
        (**self).address()
    }

    async fn create_proof(
        &self,
        recipient: &str,
        asset: &str,
        amount: U256,
        visibility: NoteVisibility,
    ) -> Result<ProvenPayment, WalletError> {
        (**self)
            .create_proof(recipient, asset, amount, visibility)
            .await
    }
}
