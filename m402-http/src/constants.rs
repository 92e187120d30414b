//! HTTP-specific constants for the x402 protocol.

/// HTTP header carrying the encoded payment on the retry request.
pub const PAYMENT_HEADER: &str = "Payment";

/// HTTP 402 Payment Required status code.
pub const HTTP_STATUS_PAYMENT_REQUIRED: u16 = 402;

/// Error message of the 402 returned when no offer can be paid.
pub const NO_COMPATIBLE_SCHEME_ERROR: &str = "No compatible payment scheme found";
