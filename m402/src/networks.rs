//! Well-known Miden networks.
//!
//! Networks are identified by CAIP-2 strings in the `miden` namespace. The
//! selector compares network strings verbatim, so these constants are a
//! convenience for building allow-lists, not a closed set.

/// CAIP-2 namespace for Miden networks.
pub const MIDEN_NAMESPACE: &str = "miden";

/// Miden public testnet.
pub const MIDEN_TESTNET: &str = "miden:testnet";

/// Miden developer network.
pub const MIDEN_DEVNET: &str = "miden:devnet";

/// Miden mainnet.
pub const MIDEN_MAINNET: &str = "miden:mainnet";

/// A known network definition with its CAIP-2 identifier and human-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network name (e.g., "miden-testnet")
    pub name: &'static str,
    /// CAIP-2 identifier (e.g., "miden:testnet")
    pub caip2: &'static str,
}

impl NetworkInfo {
    /// Returns the reference part of the CAIP-2 identifier.
    #[must_use]
    pub fn reference(&self) -> &'static str {
        self.caip2
            .split_once(':')
            .map_or(self.caip2, |(_, reference)| reference)
    }
}

/// All Miden networks known to this crate.
pub static MIDEN_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "miden-testnet",
        caip2: MIDEN_TESTNET,
    },
    NetworkInfo {
        name: "miden-devnet",
        caip2: MIDEN_DEVNET,
    },
    NetworkInfo {
        name: "miden",
        caip2: MIDEN_MAINNET,
    },
];

/// Returns `true` if `network` is one of [`MIDEN_NETWORKS`].
#[must_use]
pub fn is_known_network(network: &str) -> bool {
    MIDEN_NETWORKS.iter().any(|info| info.caip2 == network)
}

/// Looks up a network by its human-readable name.
#[must_use]
pub fn network_by_name(name: &str) -> Option<&'static NetworkInfo> {
    MIDEN_NETWORKS.iter().find(|info| info.name == name)
}
