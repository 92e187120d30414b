//! Reqwest integration for paying x402 challenges on Miden.
//!
//! [`X402Client`] wraps a [`m402::PaymentNegotiator`]. It can be used
//! directly through [`X402Client::fetch_with_payment`], or installed as a
//! `reqwest-middleware` layer with [`ReqwestWithPayments::with_payments`]:
//!
//! ```rust,ignore
//! use m402::PaymentConstraints;
//! use m402_http::client::{ReqwestWithPayments, ReqwestWithPaymentsBuild, X402Client};
//!
//! let http = reqwest::Client::new()
//!     .with_payments(X402Client::new(wallet, PaymentConstraints::unlimited()))
//!     .build();
//! let res = http.get("https://api.example.com/data").send().await?;
//! ```

mod middleware;

pub use middleware::*;

use reqwest::{Client, ClientBuilder};
use reqwest_middleware as rqm;

/// Adds x402 payment handling to reqwest clients and builders.
pub trait ReqwestWithPayments<A, W> {
    /// Wraps the client or builder with `x402_client` as middleware.
    fn with_payments(self, x402_client: X402Client<W>) -> ReqwestWithPaymentsBuilder<A, W>;
}

impl<W> ReqwestWithPayments<Self, W> for Client {
    fn with_payments(self, x402_client: X402Client<W>) -> ReqwestWithPaymentsBuilder<Self, W> {
        ReqwestWithPaymentsBuilder {
            inner: self,
            x402_client,
        }
    }
}

impl<W> ReqwestWithPayments<Self, W> for ClientBuilder {
    fn with_payments(self, x402_client: X402Client<W>) -> ReqwestWithPaymentsBuilder<Self, W> {
        ReqwestWithPaymentsBuilder {
            inner: self,
            x402_client,
        }
    }
}

/// Builder for a reqwest client with x402 middleware.
#[allow(missing_debug_implementations)] // generic A may not implement Debug
pub struct ReqwestWithPaymentsBuilder<A, W> {
    inner: A,
    x402_client: X402Client<W>,
}

/// Builds the final client from a [`ReqwestWithPaymentsBuilder`].
pub trait ReqwestWithPaymentsBuild {
    /// The type returned by [`build`](Self::build)
    type BuildResult;
    /// The type returned by [`builder`](Self::builder)
    type BuilderResult;

    /// Builds the client, consuming the builder.
    fn build(self) -> Self::BuildResult;

    /// Returns the `reqwest-middleware` builder with the payment layer added.
    fn builder(self) -> Self::BuilderResult;
}

impl<W> ReqwestWithPaymentsBuild for ReqwestWithPaymentsBuilder<Client, W>
where
    X402Client<W>: rqm::Middleware,
{
    type BuildResult = rqm::ClientWithMiddleware;
    type BuilderResult = rqm::ClientBuilder;

    fn build(self) -> Self::BuildResult {
        self.builder().build()
    }

    fn builder(self) -> Self::BuilderResult {
        rqm::ClientBuilder::new(self.inner).with(self.x402_client)
    }
}

impl<W> ReqwestWithPaymentsBuild for ReqwestWithPaymentsBuilder<ClientBuilder, W>
where
    X402Client<W>: rqm::Middleware,
{
    type BuildResult = Result<rqm::ClientWithMiddleware, reqwest::Error>;
    type BuilderResult = Result<rqm::ClientBuilder, reqwest::Error>;

    fn build(self) -> Self::BuildResult {
        let builder = self.builder()?;
        Ok(builder.build())
    }

    fn builder(self) -> Self::BuilderResult {
        let client = self.inner.build()?;
        Ok(rqm::ClientBuilder::new(client).with(self.x402_client))
    }
}
