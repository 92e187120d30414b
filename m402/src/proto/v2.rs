//! V2 payment types for the x402 protocol.
//!
//! These types correspond to the current (V2) protocol version using CAIP-2
//! network identifiers (e.g. `miden:testnet`) and structured payment
//! requirements.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::version::Version;

/// The V2 protocol version marker, serialized as the integer `2`.
pub type X402Version2 = Version<2>;

/// Describes the resource being accessed.
///
/// Servers echo the original request here; the client copies it verbatim
/// into the [`PaymentPayload`] it sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// The URL of the resource.
    pub url: String,

    /// HTTP method of the original request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request headers relevant to the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional MIME type of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// V2 payment requirements structure.
///
/// One offer from the server: what to pay, to whom, in which asset and on
/// which network.
///
/// # JSON Format
///
/// ```json
/// {
///   "scheme": "exact",
///   "network": "miden:testnet",
///   "amount": "500",
///   "payTo": "0xrecipient",
///   "asset": "0xfaucet",
///   "maxTimeoutSeconds": 300
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// Payment scheme identifier (e.g., "exact").
    ///
    /// Kept as a raw string: unknown schemes still parse and are filtered out
    /// during selection.
    pub scheme: String,

    /// CAIP-2 network identifier (e.g., "miden:testnet").
    pub network: String,

    /// Amount in the asset's smallest unit, as a decimal integer string.
    pub amount: String,

    /// Recipient account identifier.
    pub pay_to: String,

    /// Maximum time in seconds for payment validity.
    pub max_timeout_seconds: u64,

    /// Token (faucet) identifier.
    pub asset: String,

    /// Additional scheme-specific data, passed through untouched.
    ///
    /// `None` means the key was absent; an explicit `null` is kept as
    /// `Some(Value::Null)` so it is written back.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra: Option<Value>,
}

impl PaymentRequirements {
    /// Returns the payment amount as sent by the server.
    #[must_use]
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Returns the extra metadata, or `None` if it is absent or null.
    #[must_use]
    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref().filter(|v| !v.is_null())
    }
}

/// Deserializes a field that is only visited when its key is present.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// V2 402 response structure.
///
/// Sent by the resource server when payment is required. The order of
/// `accepts` is the server's preference order and is preserved as-is.
///
/// # JSON Format
///
/// ```json
/// {
///   "x402Version": 2,
///   "accepts": [{ "scheme": "exact", "network": "miden:testnet", ... }],
///   "resource": { "url": "https://api.example.com/data", "method": "GET" },
///   "error": "Payment required"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version (always 2).
    pub x402_version: X402Version2,

    /// List of accepted payment requirements.
    pub accepts: Vec<PaymentRequirements>,

    /// Optional resource information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,

    /// Optional error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional extension data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Scheme-specific body of an "exact" payment on Miden.
///
/// Carries the proven transaction produced by the wallet, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactPayload {
    /// Sender account identifier.
    pub from: String,

    /// Hex-encoded serialized proven transaction.
    pub proven_transaction: String,

    /// Transaction identifier assigned by the wallet.
    pub transaction_id: String,
}

/// V2 payment payload structure.
///
/// Sent by the client to fulfill a payment requirement. This is what gets
/// encoded into the `Payment` header of the retry request.
///
/// # JSON Format
///
/// ```json
/// {
///   "x402Version": 2,
///   "accepted": { "scheme": "exact", "network": "miden:testnet", ... },
///   "payload": { "from": "0xsender", "provenTransaction": "aabbccdd", "transactionId": "0x..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version (always 2).
    pub x402_version: X402Version2,

    /// The payment requirements being fulfilled, copied verbatim.
    pub accepted: PaymentRequirements,

    /// Resource information echoed from the 402 response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,

    /// Scheme-specific payload data.
    pub payload: ExactPayload,

    /// Optional extension data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl PaymentPayload {
    /// Returns the payment scheme from accepted requirements.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.accepted.scheme
    }

    /// Returns the network from accepted requirements.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.accepted.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_required_parses_minimal_body() {
        let body = json!({
            "x402Version": 2,
            "accepts": [{
                "scheme": "exact",
                "network": "miden:testnet",
                "amount": "500",
                "payTo": "0xrecipient",
                "asset": "0xfaucet",
                "maxTimeoutSeconds": 300
            }],
            "resource": { "url": "https://api.example.com/data", "method": "GET" }
        });
        let parsed: PaymentRequired = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.accepts.len(), 1);
        assert_eq!(parsed.accepts[0].pay_to, "0xrecipient");
        assert_eq!(parsed.accepts[0].max_timeout_seconds, 300);
        assert!(parsed.accepts[0].extra().is_none());
        let resource = parsed.resource.unwrap();
        assert_eq!(resource.method.as_deref(), Some("GET"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_payment_required_rejects_other_versions() {
        let body = json!({ "x402Version": 1, "accepts": [] });
        assert!(serde_json::from_value::<PaymentRequired>(body).is_err());
    }

    #[test]
    fn test_payment_required_requires_accepts() {
        let body = json!({ "x402Version": 2 });
        assert!(serde_json::from_value::<PaymentRequired>(body).is_err());
    }

    #[test]
    fn test_requirements_missing_field_is_rejected() {
        let body = json!({
            "scheme": "exact",
            "network": "miden:testnet",
            "amount": "500",
            "asset": "0xfaucet",
            "maxTimeoutSeconds": 300
        });
        assert!(serde_json::from_value::<PaymentRequirements>(body).is_err());
    }

    #[test]
    fn test_requirements_absent_extra_is_not_serialized() {
        let requirements = PaymentRequirements {
            scheme: "exact".into(),
            network: "miden:testnet".into(),
            amount: "1".into(),
            pay_to: "0xrecipient".into(),
            max_timeout_seconds: 60,
            asset: "0xfaucet".into(),
            extra: None,
        };
        let value = serde_json::to_value(&requirements).unwrap();
        assert!(value.get("extra").is_none());
        assert_eq!(value["payTo"], "0xrecipient");
        assert_eq!(value["maxTimeoutSeconds"], 60);
    }

    #[test]
    fn test_requirements_null_extra_differs_from_absent() {
        let mut body = json!({
            "scheme": "exact",
            "network": "miden:testnet",
            "amount": "1",
            "payTo": "0xrecipient",
            "maxTimeoutSeconds": 60,
            "asset": "0xfaucet"
        });
        let absent: PaymentRequirements = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(absent.extra, None);

        body["extra"] = Value::Null;
        let null: PaymentRequirements = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(null.extra, Some(Value::Null));
        assert_eq!(null.extra(), None);
        assert_eq!(serde_json::to_value(&null).unwrap(), body);
    }

    #[test]
    fn test_payment_payload_wire_shape() {
        let payload = PaymentPayload {
            x402_version: X402Version2::default(),
            accepted: PaymentRequirements {
                scheme: "exact".into(),
                network: "miden:testnet".into(),
                amount: "500".into(),
                pay_to: "0xrecipient".into(),
                max_timeout_seconds: 300,
                asset: "0xfaucet".into(),
                extra: Some(json!({ "decimals": 6 })),
            },
            resource: None,
            payload: ExactPayload {
                from: "0xsender".into(),
                proven_transaction: "aabbccdd".into(),
                transaction_id: "tx-1".into(),
            },
            extensions: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["x402Version"], 2);
        assert_eq!(value["payload"]["provenTransaction"], "aabbccdd");
        assert_eq!(value["payload"]["transactionId"], "tx-1");
        assert_eq!(value["accepted"]["extra"]["decimals"], 6);
        assert!(value.get("resource").is_none());
        assert_eq!(payload.scheme(), "exact");
        assert_eq!(payload.network(), "miden:testnet");
    }
}
