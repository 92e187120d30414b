#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types and payment negotiation for the x402 protocol on Miden.
//!
//! When a server answers a request with `402 Payment Required`, the body lists
//! the payments it accepts. This crate decides which of those offers to pay,
//! asks a wallet for a proven Miden transaction, and encodes the result into
//! the header the client sends when it retries the request.
//!
//! The HTTP side (sending, detecting 402, retrying) lives in `m402-http`.
//!
//! # Modules
//!
//! - [`amount`] - Decimal amount parsing into [`amount::U256`]
//! - [`config`] - Constraint configuration, from files or the command line
//! - [`encoding`] - Base64 transport encoding of protocol messages
//! - [`error`] - Error types
//! - [`negotiator`] - Parse, select, prove, encode
//! - [`networks`] - Well-known Miden networks
//! - [`proto`] - Wire format types
//! - [`scheme`] - Supported payment schemes
//! - [`selector`] - Offer selection under [`selector::PaymentConstraints`]
//! - [`wallet`] - The [`wallet::ProofCreator`] capability
//!
//! # Example
//!
//! ```rust,ignore
//! use m402::negotiator::PaymentNegotiator;
//! use m402::selector::PaymentConstraints;
//!
//! let negotiator = PaymentNegotiator::new(
//!     my_wallet,
//!     PaymentConstraints::unlimited().allow_network(m402::networks::MIDEN_TESTNET),
//! );
//! if let Some(payment) = negotiator.negotiate(status, &body).await? {
//!     // retry the request with `Payment: {payment.payment_header}`
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `cli` - Enables `clap` argument parsing for [`config::ConstraintsArgs`]
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod amount;
pub mod config;
pub mod encoding;
pub mod error;
pub mod negotiator;
pub mod networks;
pub mod proto;
pub mod scheme;
pub mod selector;
pub mod wallet;

pub use error::{CodecError, NegotiationError, ProofCreationError};
pub use negotiator::{PaymentNegotiator, PaymentResult};
pub use selector::PaymentConstraints;
pub use wallet::{NoteVisibility, ProofCreator, ProvenPayment};
