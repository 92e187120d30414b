//! Client-side x402 payment handling for reqwest.
//!
//! This module provides the [`X402Client`], which answers a `402 Payment
//! Required` response by negotiating a payment and retrying the request once
//! with the `Payment` header.

use std::sync::Arc;

use http::{Extensions, StatusCode};
use m402::negotiator::parse_payment_required;
use m402::{PaymentConstraints, PaymentNegotiator, PaymentResult, ProofCreator};
use reqwest::{Request, Response};
use reqwest_middleware as rqm;
#[cfg(feature = "telemetry")]
use tracing::{debug, info, instrument, trace};

use crate::constants::PAYMENT_HEADER;
use crate::error::ClientError;
use crate::headers::{no_compatible_scheme_http_response, payment_header_value};

/// Callback invoked with each payment right before it is sent.
pub type PaymentObserver = dyn Fn(&PaymentResult) + Send + Sync;

/// Per-client fetch behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchMode {
    /// Return every 402 to the caller untouched, without negotiating.
    pub dry_run: bool,
}

/// Pays for 402 responses and retries the request.
///
/// A request goes out at most twice. If the first response is a 402 the
/// client negotiates a payment and retries with the `Payment` header. The
/// response to the retry is returned as-is, even when it is another 402.
///
/// When no offer can be paid the caller receives a synthetic 402 (see
/// [`no_compatible_scheme_response`]) instead of an error.
pub struct X402Client<W> {
    negotiator: Arc<PaymentNegotiator<W>>,
    mode: FetchMode,
    on_payment: Option<Arc<PaymentObserver>>,
}

impl<W> X402Client<W> {
    /// Creates a client paying from `wallet` within `constraints`.
    pub fn new(wallet: W, constraints: PaymentConstraints) -> Self {
        Self::from_negotiator(Arc::new(PaymentNegotiator::new(wallet, constraints)))
    }

    /// Creates a client around an existing, possibly shared, negotiator.
    #[must_use]
    pub const fn from_negotiator(negotiator: Arc<PaymentNegotiator<W>>) -> Self {
        Self {
            negotiator,
            mode: FetchMode { dry_run: false },
            on_payment: None,
        }
    }

    /// Sets the fetch mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Switches the client to dry-run: 402 responses are returned unpaid.
    #[must_use]
    pub const fn dry_run(self) -> Self {
        self.with_mode(FetchMode { dry_run: true })
    }

    /// Registers a callback run once per payment, just before the retry.
    ///
    /// Not called in dry-run mode, when no offer is selected, or when the
    /// payment cannot be created.
    #[must_use]
    pub fn on_payment<F>(mut self, observer: F) -> Self
    where
        F: Fn(&PaymentResult) + Send + Sync + 'static,
    {
        self.on_payment = Some(Arc::new(observer));
        self
    }

    /// Returns the negotiator used for 402 responses.
    #[must_use]
    pub fn negotiator(&self) -> &PaymentNegotiator<W> {
        &self.negotiator
    }

    /// Returns the fetch mode.
    #[must_use]
    pub const fn mode(&self) -> FetchMode {
        self.mode
    }
}

impl<W> Clone for X402Client<W> {
    fn clone(&self) -> Self {
        Self {
            negotiator: Arc::clone(&self.negotiator),
            mode: self.mode,
            on_payment: self.on_payment.clone(),
        }
    }
}

impl<W> std::fmt::Debug for X402Client<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X402Client")
            .field("constraints", self.negotiator.constraints())
            .field("mode", &self.mode)
            .field("on_payment", &self.on_payment.is_some())
            .finish_non_exhaustive()
    }
}

/// What to do after the first response came back 402.
enum PaymentStep {
    /// Hand this response to the caller.
    Return(Response),
    /// Send this request, which carries the payment.
    Retry(Request),
}

impl<W> X402Client<W>
where
    W: ProofCreator,
{
    /// Sends `request` through `client`, paying for a 402 if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if a request or the 402 body read
    /// fails, [`ClientError::Negotiation`] if the selected payment cannot be
    /// created, and [`ClientError::RequestNotCloneable`] if an offer was
    /// selected but the request body cannot be replayed. In that last case
    /// the wallet is not called.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "x402.fetch", skip_all, fields(url = %request.url()), err)
    )]
    pub async fn fetch_with_payment(
        &self,
        client: &reqwest::Client,
        request: Request,
    ) -> Result<Response, ClientError> {
        let retry_req = request.try_clone();
        let res = client.execute(request).await?;

        if res.status() != StatusCode::PAYMENT_REQUIRED {
            #[cfg(feature = "telemetry")]
            trace!(status = ?res.status(), "No payment required, returning response");
            return Ok(res);
        }

        match self.handle_payment_required(res, retry_req).await? {
            PaymentStep::Return(res) => Ok(res),
            PaymentStep::Retry(retry) => Ok(client.execute(retry).await?),
        }
    }

    async fn handle_payment_required(
        &self,
        res: Response,
        retry_req: Option<Request>,
    ) -> Result<PaymentStep, ClientError> {
        if self.mode.dry_run {
            #[cfg(feature = "telemetry")]
            debug!("Dry run, returning 402 unpaid");
            return Ok(PaymentStep::Return(res));
        }

        #[cfg(feature = "telemetry")]
        info!(url = ?res.url(), "Received 402 Payment Required, processing payment");

        let status = res.status().as_u16();
        let body = res.bytes().await?;

        let Some(payment_required) = parse_payment_required(status, &body) else {
            #[cfg(feature = "telemetry")]
            debug!("Unusable 402 body, returning synthetic 402");
            return Ok(PaymentStep::Return(no_compatible_scheme_response()));
        };
        let Some(requirements) = self.negotiator.select(&payment_required) else {
            #[cfg(feature = "telemetry")]
            debug!("No compatible payment offer, returning synthetic 402");
            return Ok(PaymentStep::Return(no_compatible_scheme_response()));
        };

        let mut retry = retry_req.ok_or(ClientError::RequestNotCloneable)?;
        let payment = self
            .negotiator
            .pay(&payment_required, requirements)
            .await?;

        retry
            .headers_mut()
            .insert(PAYMENT_HEADER, payment_header_value(&payment)?);

        if let Some(observer) = &self.on_payment {
            observer(&payment);
        }

        #[cfg(feature = "telemetry")]
        trace!(
            url = ?retry.url(),
            transaction_id = %payment.transaction_id,
            "Retrying request with payment header"
        );

        Ok(PaymentStep::Retry(retry))
    }
}

/// Builds the 402 returned when none of the offers can be paid.
///
/// The body is `{"error": "No compatible payment scheme found", "x402Version": 2}`.
#[must_use]
pub fn no_compatible_scheme_response() -> Response {
    Response::from(no_compatible_scheme_http_response())
}

/// Runs the next middleware or HTTP client with optional telemetry instrumentation.
#[cfg_attr(
    feature = "telemetry",
    instrument(name = "x402.reqwest.next", skip_all)
)]
async fn run_next(
    next: rqm::Next<'_>,
    req: Request,
    extensions: &mut Extensions,
) -> rqm::Result<Response> {
    next.run(req, extensions).await
}

#[async_trait::async_trait]
impl<W> rqm::Middleware for X402Client<W>
where
    W: ProofCreator + 'static,
{
    /// Handles a request, paying for a 402 response and retrying once.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "x402.reqwest.handle", skip_all, err)
    )]
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        let retry_req = req.try_clone();
        let res = run_next(next.clone(), req, extensions).await?;

        if res.status() != StatusCode::PAYMENT_REQUIRED {
            #[cfg(feature = "telemetry")]
            trace!(status = ?res.status(), "No payment required, returning response");
            return Ok(res);
        }

        match self.handle_payment_required(res, retry_req).await? {
            PaymentStep::Return(res) => Ok(res),
            PaymentStep::Retry(retry) => run_next(next, retry, extensions).await,
        }
    }
}
