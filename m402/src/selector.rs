//! Requirement selection under caller constraints.
//!
//! Selection is a single pass over the server's offers in the order they were
//! sent; the first offer that passes every filter wins. There is no scoring
//! and no price comparison between offers.

use std::collections::BTreeSet;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::amount::{DecimalAmount, parse_amount};
use crate::proto::PaymentRequirements;
use crate::scheme::Scheme;

/// Caller policy applied to every offer.
///
/// Empty sets and an absent or zero `max_payment` impose no restriction.
///
/// # Example
///
/// ```rust
/// use m402::amount::U256;
/// use m402::selector::PaymentConstraints;
///
/// let constraints = PaymentConstraints::unlimited()
///     .with_max_payment(U256::from(1_000_000u64))
///     .allow_network("miden:testnet")
///     .allow_faucet("0xfaucet");
/// assert_eq!(constraints.max_payment(), Some(U256::from(1_000_000u64)));
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConstraints {
    /// Upper bound on the amount of a single payment, inclusive.
    #[serde_as(as = "Option<DecimalAmount>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_payment: Option<U256>,

    /// Accepted asset (faucet) identifiers.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    allowed_faucets: BTreeSet<String>,

    /// Accepted network identifiers.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    allowed_networks: BTreeSet<String>,
}

impl PaymentConstraints {
    /// Constraints that accept any "exact" offer.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Sets the maximum amount for a single payment. Zero means unlimited.
    #[must_use]
    pub fn with_max_payment(mut self, max_payment: U256) -> Self {
        self.max_payment = Some(max_payment);
        self
    }

    /// Adds an asset to the allow-list.
    #[must_use]
    pub fn allow_faucet(mut self, faucet: impl Into<String>) -> Self {
        self.allowed_faucets.insert(faucet.into());
        self
    }

    /// Adds a network to the allow-list.
    #[must_use]
    pub fn allow_network(mut self, network: impl Into<String>) -> Self {
        self.allowed_networks.insert(network.into());
        self
    }

    /// Returns the effective payment bound, or `None` when unlimited.
    #[must_use]
    pub fn max_payment(&self) -> Option<U256> {
        self.max_payment.filter(|max| !max.is_zero())
    }

    /// Returns the asset allow-list.
    #[must_use]
    pub const fn allowed_faucets(&self) -> &BTreeSet<String> {
        &self.allowed_faucets
    }

    /// Returns the network allow-list.
    #[must_use]
    pub const fn allowed_networks(&self) -> &BTreeSet<String> {
        &self.allowed_networks
    }

    /// Returns `true` if a single offer passes every filter.
    ///
    /// The amount is only parsed when a bound is active; a malformed amount
    /// disqualifies the offer in that case and is ignored otherwise.
    #[must_use]
    pub fn admits(&self, requirements: &PaymentRequirements) -> bool {
        if requirements.scheme.parse::<Scheme>().is_err() {
            return false;
        }
        if !self.allowed_networks.is_empty()
            && !self.allowed_networks.contains(&requirements.network)
        {
            return false;
        }
        if !self.allowed_faucets.is_empty() && !self.allowed_faucets.contains(&requirements.asset) {
            return false;
        }
        if let Some(max) = self.max_payment() {
            return parse_amount(requirements.amount()).is_some_and(|amount| amount <= max);
        }
        true
    }
}

/// Picks the first offer admitted by `constraints`.
///
/// Returns `None` if `offers` is empty or nothing passes.
#[must_use]
pub fn select<'a>(
    offers: &'a [PaymentRequirements],
    constraints: &PaymentConstraints,
) -> Option<&'a PaymentRequirements> {
    offers.iter().find(|offer| constraints.admits(offer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(network: &str, asset: &str, amount: &str) -> PaymentRequirements {
        PaymentRequirements {
            scheme: "exact".into(),
            network: network.into(),
            amount: amount.into(),
            pay_to: "0xrecipient".into(),
            max_timeout_seconds: 300,
            asset: asset.into(),
            extra: None,
        }
    }

    fn default_offer() -> PaymentRequirements {
        offer("miden:testnet", "0xfaucet", "500")
    }

    #[test]
    fn test_empty_offers_yield_none() {
        assert!(select(&[], &PaymentConstraints::unlimited()).is_none());
    }

    #[test]
    fn test_unlimited_accepts_exact_offer() {
        let offers = [default_offer()];
        let selected = select(&offers, &PaymentConstraints::unlimited()).unwrap();
        assert_eq!(selected, &offers[0]);
    }

    #[test]
    fn test_non_exact_scheme_rejected() {
        let mut upto = default_offer();
        upto.scheme = "upto".into();
        let mut capitalised = default_offer();
        capitalised.scheme = "Exact".into();
        let offers = [upto, capitalised, offer("miden:testnet", "0xfaucet", "7")];
        let selected = select(&offers, &PaymentConstraints::unlimited()).unwrap();
        assert_eq!(selected.amount, "7");
    }

    #[test]
    fn test_network_allow_list() {
        let offers = [
            offer("miden:mainnet", "0xfaucet", "1"),
            offer("miden:testnet", "0xfaucet", "2"),
        ];
        let constraints = PaymentConstraints::unlimited().allow_network("miden:testnet");
        assert_eq!(select(&offers, &constraints).unwrap().amount, "2");

        let constraints = PaymentConstraints::unlimited().allow_network("miden:devnet");
        assert!(select(&offers, &constraints).is_none());
    }

    #[test]
    fn test_faucet_allow_list() {
        let offers = [
            offer("miden:testnet", "0xother", "1"),
            offer("miden:testnet", "0xfaucet", "2"),
        ];
        let constraints = PaymentConstraints::unlimited().allow_faucet("0xfaucet");
        assert_eq!(select(&offers, &constraints).unwrap().asset, "0xfaucet");
    }

    #[test]
    fn test_max_payment_is_inclusive() {
        let offers = [default_offer()];
        let at_limit = PaymentConstraints::unlimited().with_max_payment(U256::from(500u64));
        assert!(select(&offers, &at_limit).is_some());

        let below = PaymentConstraints::unlimited().with_max_payment(U256::from(499u64));
        assert!(select(&offers, &below).is_none());
    }

    #[test]
    fn test_max_payment_one_rejects_500() {
        let offers = [default_offer()];
        let constraints = PaymentConstraints::unlimited().with_max_payment(U256::from(1u64));
        assert!(select(&offers, &constraints).is_none());
    }

    #[test]
    fn test_zero_max_payment_is_unlimited() {
        let offers = [offer("miden:testnet", "0xfaucet", "99999999999999999999999999")];
        let constraints = PaymentConstraints::unlimited().with_max_payment(U256::ZERO);
        assert_eq!(constraints.max_payment(), None);
        assert!(select(&offers, &constraints).is_some());
    }

    #[test]
    fn test_malformed_amount_rejected_only_under_bound() {
        let offers = [
            offer("miden:testnet", "0xfaucet", "lots"),
            offer("miden:testnet", "0xfaucet", "10"),
        ];
        let unbounded = PaymentConstraints::unlimited();
        assert_eq!(select(&offers, &unbounded).unwrap().amount, "lots");

        let bounded = PaymentConstraints::unlimited().with_max_payment(U256::from(100u64));
        assert_eq!(select(&offers, &bounded).unwrap().amount, "10");
    }

    #[test]
    fn test_amount_beyond_u64_compared_exactly() {
        let offers = [offer("miden:testnet", "0xfaucet", "18446744073709551616")];
        let just_below = PaymentConstraints::unlimited()
            .with_max_payment(U256::from(u64::MAX));
        assert!(select(&offers, &just_below).is_none());
        let at = PaymentConstraints::unlimited()
            .with_max_payment(U256::from(u64::MAX) + U256::from(1u64));
        assert!(select(&offers, &at).is_some());
    }

    #[test]
    fn test_first_match_not_best_match() {
        let a = offer("miden:testnet", "0xfaucet", "900");
        let b = offer("miden:testnet", "0xfaucet", "100");
        let constraints = PaymentConstraints::unlimited();

        let forward = [a.clone(), b.clone()];
        assert_eq!(select(&forward, &constraints).unwrap().amount, "900");

        let reversed = [b, a];
        assert_eq!(select(&reversed, &constraints).unwrap().amount, "100");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let offers = [
            offer("miden:mainnet", "0xfaucet", "5"),
            offer("miden:testnet", "0xfaucet", "6"),
            offer("miden:testnet", "0xother", "7"),
        ];
        let constraints = PaymentConstraints::unlimited().allow_network("miden:testnet");
        let first = select(&offers, &constraints).map(|o| o.amount.clone());
        for _ in 0..16 {
            assert_eq!(select(&offers, &constraints).map(|o| o.amount.clone()), first);
        }
    }

    #[test]
    fn test_tightening_never_admits_rejected_offer() {
        let offers = [
            offer("miden:testnet", "0xfaucet", "500"),
            offer("miden:mainnet", "0xfaucet", "50"),
            offer("miden:testnet", "0xother", "5"),
            offer("miden:testnet", "0xfaucet", "junk"),
        ];
        let loose = PaymentConstraints::unlimited()
            .with_max_payment(U256::from(400u64))
            .allow_network("miden:testnet")
            .allow_network("miden:mainnet");
        let tighter = [
            loose.clone().with_max_payment(U256::from(10u64)),
            PaymentConstraints::unlimited()
                .with_max_payment(U256::from(400u64))
                .allow_network("miden:testnet"),
            loose.clone().allow_faucet("0xother"),
        ];
        for offer in &offers {
            if !loose.admits(offer) {
                for tight in &tighter {
                    assert!(!tight.admits(offer), "{offer:?} admitted by {tight:?}");
                }
            }
        }
    }

    #[test]
    fn test_constraints_deserialize_from_config() {
        let constraints: PaymentConstraints = serde_json::from_str(
            r#"{
                "maxPayment": "340282366920938463463374607431768211456",
                "allowedFaucets": ["0xfaucet"],
                "allowedNetworks": ["miden:testnet"]
            }"#,
        )
        .unwrap();
        assert_eq!(
            constraints.max_payment(),
            Some(U256::from(u128::MAX) + U256::from(1u64))
        );
        assert!(constraints.allowed_faucets().contains("0xfaucet"));
        assert!(constraints.allowed_networks().contains("miden:testnet"));

        let empty: PaymentConstraints = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PaymentConstraints::unlimited());
    }

    #[test]
    fn test_config_max_payment_is_decimal_only() {
        for bad in [r#""0x10""#, r#""-1""#, r#""1.5""#, r#""""#, "16"] {
            let json = format!(r#"{{ "maxPayment": {bad} }}"#);
            assert!(
                serde_json::from_str::<PaymentConstraints>(&json).is_err(),
                "{bad} should be rejected"
            );
        }

        let bounded = PaymentConstraints::unlimited().with_max_payment(U256::from(16u64));
        let value = serde_json::to_value(&bounded).unwrap();
        assert_eq!(value["maxPayment"], "16");
        assert_eq!(
            serde_json::from_value::<PaymentConstraints>(value).unwrap(),
            bounded
        );
    }
}
