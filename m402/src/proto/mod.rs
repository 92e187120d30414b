//! Protocol types for x402 payment messages.
//!
//! This module defines the wire format exchanged between a paying client and
//! a resource server. Only protocol version 2 is spoken: a 402 body with any
//! other `x402Version` does not deserialize.
//!
//! # Key Types
//!
//! - [`PaymentRequired`] - The 402 response body listing accepted offers
//! - [`PaymentRequirements`] - A single offer
//! - [`PaymentPayload`] - The signed envelope sent back in the `Payment` header
//! - [`ExactPayload`] - Scheme body carrying the proven Miden transaction
//!
//! # Wire Format
//!
//! All types serialize to JSON using camelCase field names.

mod version;
pub mod v2;

pub use v2::*;
pub use version::Version;
