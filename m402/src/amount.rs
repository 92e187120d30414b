//! Token amount parsing.
//!
//! Amounts travel as decimal integer strings in the smallest unit of the
//! asset. They are compared as [`U256`] values, never as floats.

pub use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// A string that is not a plain decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid payment amount '{0}': expected a decimal integer")]
pub struct InvalidAmountError(pub String);

/// Parses a wire amount into a [`U256`].
///
/// Only plain decimal digits are accepted: no sign, no `0x` prefix, no
/// separators, no surrounding whitespace. Returns `None` for anything else,
/// including values that do not fit in 256 bits.
#[must_use]
pub fn parse_amount(amount: &str) -> Option<U256> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(amount, 10).ok()
}

/// Like [`parse_amount`], reporting the rejected input.
///
/// # Errors
///
/// Returns [`InvalidAmountError`] if `amount` is not a plain decimal integer
/// that fits in 256 bits.
pub fn try_parse_amount(amount: &str) -> Result<U256, InvalidAmountError> {
    parse_amount(amount).ok_or_else(|| InvalidAmountError(amount.to_owned()))
}

/// `serde_with` adapter writing a [`U256`] as a decimal string and reading it
/// back with [`try_parse_amount`].
#[derive(Debug, Clone, Copy)]
pub struct DecimalAmount;

impl SerializeAs<U256> for DecimalAmount {
    fn serialize_as<S: Serializer>(source: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(source)
    }
}

impl<'de> DeserializeAs<'de, U256> for DecimalAmount {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        try_parse_amount(&s).map_err(serde::de::Error::custom)
    }
}
