//! Turning a 402 response into a payment header.
//!
//! Negotiation runs four steps in order:
//!
//! 1. **Parse** the 402 body into a [`PaymentRequired`]. Any status other than
//!    402, malformed JSON, a version other than 2 or a malformed offer yields
//!    `None`.
//! 2. **Select** the first acceptable offer (see [`crate::selector`]). No
//!    acceptable offer yields `None`.
//! 3. **Prove** the payment through the [`ProofCreator`], always with a public
//!    note. Wallet failures, unsupported schemes and malformed amounts are all
//!    returned as [`NegotiationError::ProofCreation`].
//! 4. **Encode** the [`PaymentPayload`] into the `Payment` header value.
//!
//! The wallet is called at most once per negotiation, and never when step 1 or
//! 2 comes back empty.

use crate::amount::try_parse_amount;
use crate::encoding::encode_payment_payload;
use crate::error::{NegotiationError, ProofCreationError};
use crate::proto::{ExactPayload, PaymentPayload, PaymentRequired, PaymentRequirements, X402Version2};
use crate::scheme::Scheme;
use crate::selector::{PaymentConstraints, select};
use crate::wallet::{NoteVisibility, ProofCreator, ProvenPayment};

#[cfg(feature = "telemetry")]
use tracing::{debug, instrument, trace};

/// HTTP status code of a payment challenge.
pub const PAYMENT_REQUIRED_STATUS: u16 = 402;

/// Outcome of a successful negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    /// Transaction identifier reported by the wallet.
    pub transaction_id: String,
    /// Encoded [`PaymentPayload`], ready for the `Payment` header.
    pub payment_header: String,
    /// The offer that was paid.
    pub requirements: PaymentRequirements,
}

/// Parses a 402 response body.
///
/// Returns `None` without looking at the body if `status` is not 402, and
/// `None` if the body is not a valid V2 [`PaymentRequired`].
#[must_use]
pub fn parse_payment_required(status: u16, body: &[u8]) -> Option<PaymentRequired> {
    if status != PAYMENT_REQUIRED_STATUS {
        return None;
    }
    match serde_json::from_slice::<PaymentRequired>(body) {
        Ok(payment_required) => Some(payment_required),
        Err(_err) => {
            #[cfg(feature = "telemetry")]
            debug!(error = %_err, "Unusable 402 body");
            None
        }
    }
}

/// Negotiates payments on behalf of one wallet under fixed constraints.
///
/// Constraints are set at construction and never change. A negotiator holds
/// no other state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PaymentNegotiator<W> {
    wallet: W,
    constraints: PaymentConstraints,
}

impl<W> PaymentNegotiator<W> {
    /// Creates a negotiator paying from `wallet` within `constraints`.
    pub const fn new(wallet: W, constraints: PaymentConstraints) -> Self {
        Self {
            wallet,
            constraints,
        }
    }

    /// Returns the constraints applied to every offer.
    #[must_use]
    pub const fn constraints(&self) -> &PaymentConstraints {
        &self.constraints
    }

    /// Returns the wallet used to prove payments.
    #[must_use]
    pub const fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Picks the offer this negotiator would pay, if any.
    #[must_use]
    pub fn select<'a>(
        &self,
        payment_required: &'a PaymentRequired,
    ) -> Option<&'a PaymentRequirements> {
        select(&payment_required.accepts, &self.constraints)
    }
}

impl<W: ProofCreator> PaymentNegotiator<W> {
    /// Runs the full negotiation on a response status and body.
    ///
    /// Returns `Ok(None)` when there is nothing this negotiator can pay.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError`] if an offer was selected but could not be
    /// proven or encoded.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "x402.negotiate", skip_all, fields(status = status), err)
    )]
    pub async fn negotiate(
        &self,
        status: u16,
        body: &[u8],
    ) -> Result<Option<PaymentResult>, NegotiationError> {
        let Some(payment_required) = parse_payment_required(status, body) else {
            return Ok(None);
        };
        let Some(requirements) = self.select(&payment_required) else {
            #[cfg(feature = "telemetry")]
            debug!(
                offers = payment_required.accepts.len(),
                "No offer satisfies the payment constraints"
            );
            return Ok(None);
        };

        #[cfg(feature = "telemetry")]
        debug!(
            scheme = %requirements.scheme,
            network = %requirements.network,
            asset = %requirements.asset,
            amount = %requirements.amount,
            "Selected payment requirement"
        );

        self.pay(&payment_required, requirements).await.map(Some)
    }

    /// Proves and encodes a payment for one offer.
    ///
    /// `requirements` is copied verbatim into the payload; the resource info
    /// of `payment_required` is echoed when present.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::ProofCreation`] if the wallet fails or the
    /// offer has an unsupported scheme or a malformed amount, and
    /// [`NegotiationError::Codec`] if the payload cannot be encoded.
    pub async fn pay(
        &self,
        payment_required: &PaymentRequired,
        requirements: &PaymentRequirements,
    ) -> Result<PaymentResult, NegotiationError> {
        let scheme: Scheme = requirements
            .scheme
            .parse()
            .map_err(ProofCreationError::new)?;
        let proven = match scheme {
            Scheme::Exact => self.prove_exact(requirements).await?,
        };

        #[cfg(feature = "telemetry")]
        trace!(transaction_id = %proven.transaction_id, "Payment proven");

        let payload = PaymentPayload {
            x402_version: X402Version2::default(),
            accepted: requirements.clone(),
            resource: payment_required.resource.clone(),
            payload: ExactPayload {
                from: self.wallet.address().to_owned(),
                proven_transaction: proven.proven_artifact_hex,
                transaction_id: proven.transaction_id.clone(),
            },
            extensions: None,
        };
        let payment_header = encode_payment_payload(&payload)?;

        Ok(PaymentResult {
            transaction_id: proven.transaction_id,
            payment_header,
            requirements: requirements.clone(),
        })
    }

    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "x402.prove", skip_all, fields(pay_to = %requirements.pay_to), err)
    )]
    async fn prove_exact(
        &self,
        requirements: &PaymentRequirements,
    ) -> Result<ProvenPayment, NegotiationError> {
        let amount = try_parse_amount(requirements.amount()).map_err(ProofCreationError::new)?;
        self.wallet
            .create_proof(
                &requirements.pay_to,
                &requirements.asset,
                amount,
                NoteVisibility::Public,
            )
            .await
            .map_err(|e| ProofCreationError::new(e).into())
    }
}
