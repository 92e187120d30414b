//! HTTP header helpers for the `Payment` header.
//!
//! The header value is the base64 payload produced by
//! [`m402::encoding::encode_payment_payload`]; these helpers convert between
//! that string and [`http::HeaderValue`].

use http::HeaderValue;
use http::header::InvalidHeaderValue;
use m402::encoding::decode_payment_payload;
use m402::proto::PaymentPayload;
use m402::{CodecError, PaymentResult};

use crate::constants::NO_COMPATIBLE_SCHEME_ERROR;

/// Builds the `Payment` header value for a negotiated payment.
///
/// # Errors
///
/// Returns [`InvalidHeaderValue`] if the header string contains bytes that
/// are not allowed in a header. Values produced by the negotiator never do.
pub fn payment_header_value(payment: &PaymentResult) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&payment.payment_header)
}

/// Decodes a `Payment` header value into a [`PaymentPayload`].
///
/// Intended for servers and tests inspecting what a client sent.
///
/// # Errors
///
/// Returns [`CodecError`] if the value is not a valid encoded payload. A
/// value that is not visible ASCII is reported as a base64 error.
pub fn decode_payment_header(value: &HeaderValue) -> Result<PaymentPayload, CodecError> {
    match value.to_str() {
        Ok(s) => decode_payment_payload(s),
        Err(_) => decode_payment_payload(&String::from_utf8_lossy(value.as_bytes())),
    }
}

/// JSON body of the 402 returned when no offer can be paid.
#[must_use]
pub fn no_compatible_scheme_body() -> String {
    serde_json::json!({
        "error": NO_COMPATIBLE_SCHEME_ERROR,
        "x402Version": 2,
    })
    .to_string()
}

/// Builds the 402 returned when no offer can be paid, as an [`http::Response`].
#[must_use]
pub fn no_compatible_scheme_http_response() -> http::Response<String> {
    let mut response = http::Response::new(no_compatible_scheme_body());
    *response.status_mut() = http::StatusCode::PAYMENT_REQUIRED;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
