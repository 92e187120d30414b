//! Transport encoding for x402 protocol messages.
//!
//! Messages travel in HTTP headers as base64 (standard alphabet, padded) over
//! the UTF-8 JSON form of the message. The output only ever contains
//! `[A-Za-z0-9+/=]`, so it is a valid header value whatever the content of
//! the string fields it carries.
//!
//! JSON numbers inside opaque fields (`extra`, `extensions`) are kept
//! digit-for-digit, so integers beyond 64 bits survive a round trip.

use std::fmt::Display;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;

use crate::error::CodecError;
use crate::proto::{PaymentPayload, PaymentRequired};

/// A wrapper for base64-encoded byte data.
///
/// This type holds bytes that represent base64-encoded data and provides
/// methods for encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Bytes(pub Vec<u8>);

impl Base64Bytes {
    /// Decodes the base64 string bytes to raw binary data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        b64.decode(&self.0)
    }

    /// Encodes raw binary data into base64 string bytes.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Self {
        let encoded = b64.encode(input.as_ref());
        Self(encoded.into_bytes())
    }
}

impl AsRef<[u8]> for Base64Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Base64Bytes {
    fn from(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }
}

impl Display for Base64Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Encodes a [`PaymentPayload`] as a base64 string for the `Payment` header.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if JSON serialization fails.
pub fn encode_payment_payload(payload: &PaymentPayload) -> Result<String, CodecError> {
    encode_json(payload)
}

/// Decodes a `Payment` header value back into a [`PaymentPayload`].
///
/// Surrounding whitespace is ignored; anything else that is not the exact
/// output of [`encode_payment_payload`] is an error.
///
/// # Errors
///
/// Returns [`CodecError::Base64`] if the value is not valid base64, or
/// [`CodecError::Json`] if the decoded bytes are not a payment payload.
pub fn decode_payment_payload(header_value: &str) -> Result<PaymentPayload, CodecError> {
    decode_json(header_value)
}

/// Encodes a [`PaymentRequired`] as a base64 string for the
/// `Payment-Required` header.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if JSON serialization fails.
pub fn encode_payment_required(required: &PaymentRequired) -> Result<String, CodecError> {
    encode_json(required)
}

/// Decodes a `Payment-Required` header value into a [`PaymentRequired`].
///
/// # Errors
///
/// Returns [`CodecError`] on base64 or JSON decode failure.
pub fn decode_payment_required(header_value: &str) -> Result<PaymentRequired, CodecError> {
    decode_json(header_value)
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(value)?;
    Ok(b64.encode(json))
}

fn decode_json<T: serde::de::DeserializeOwned>(header_value: &str) -> Result<T, CodecError> {
    let bytes = Base64Bytes::from(header_value.trim().as_bytes()).decode()?;
    Ok(serde_json::from_slice(&bytes)?)
}
