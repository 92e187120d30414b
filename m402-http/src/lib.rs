#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport layer for x402 payments on Miden.
//!
//! Sends a request, and when the server answers `402 Payment Required`,
//! negotiates a payment with [`m402`] and retries once with the `Payment`
//! header.
//!
//! # Modules
//!
//! - [`constants`] - Header names, status codes, error messages
//! - [`headers`] - `Payment` header conversion and the synthetic 402 body
//! - [`error`] - Transport error types (feature: `client`)
//! - [`client`] - Request retrier and reqwest middleware (feature: `client`)
//!
//! # Feature Flags
//!
//! - `client` (default) - reqwest client and middleware
//! - `telemetry` - tracing instrumentation

pub mod constants;
pub mod headers;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod error;

#[cfg(feature = "client")]
pub use client::{FetchMode, X402Client, no_compatible_scheme_response};
#[cfg(feature = "client")]
pub use error::ClientError;
