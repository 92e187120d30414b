//! Configuration for paying clients.
//!
//! [`PaymentConstraints`] deserializes directly from a config file:
//!
//! ```json
//! {
//!   "maxPayment": "1000000",
//!   "allowedFaucets": ["0xfaucet"],
//!   "allowedNetworks": ["miden:testnet"]
//! }
//! ```
//!
//! With the `cli` feature, [`ConstraintsArgs`] exposes the same settings as
//! command-line flags backed by environment variables:
//!
//! - `X402_MAX_PAYMENT` - maximum amount per payment, decimal (0 = unlimited)
//! - `X402_ALLOWED_FAUCETS` - comma-separated asset identifiers
//! - `X402_ALLOWED_NETWORKS` - comma-separated CAIP-2 network identifiers

use alloy_primitives::U256;

pub use crate::selector::PaymentConstraints;

/// Command-line and environment settings for [`PaymentConstraints`].
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintsArgs {
    /// Maximum amount for a single payment, in the asset's smallest unit.
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "X402_MAX_PAYMENT", value_parser = crate::amount::try_parse_amount)
    )]
    pub max_payment: Option<U256>,

    /// Asset (faucet) identifiers the client may pay with.
    #[cfg_attr(
        feature = "cli",
        arg(long = "allowed-faucet", env = "X402_ALLOWED_FAUCETS", value_delimiter = ',')
    )]
    pub allowed_faucets: Vec<String>,

    /// Networks the client may pay on.
    #[cfg_attr(
        feature = "cli",
        arg(long = "allowed-network", env = "X402_ALLOWED_NETWORKS", value_delimiter = ',')
    )]
    pub allowed_networks: Vec<String>,
}

impl From<ConstraintsArgs> for PaymentConstraints {
    fn from(args: ConstraintsArgs) -> Self {
        let mut constraints = Self::unlimited();
        if let Some(max) = args.max_payment {
            constraints = constraints.with_max_payment(max);
        }
        let constraints = args
            .allowed_faucets
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .fold(constraints, |c, faucet| c.allow_faucet(faucet));
        args.allowed_networks
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .fold(constraints, |c, network| c.allow_network(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_are_unlimited() {
        let constraints = PaymentConstraints::from(ConstraintsArgs::default());
        assert_eq!(constraints, PaymentConstraints::unlimited());
    }

    #[test]
    fn test_args_convert_to_constraints() {
        let args = ConstraintsArgs {
            max_payment: Some(U256::from(250u64)),
            allowed_faucets: vec![" 0xfaucet ".into(), String::new()],
            allowed_networks: vec!["miden:testnet".into(), "miden:devnet".into()],
        };
        let constraints = PaymentConstraints::from(args);
        assert_eq!(constraints.max_payment(), Some(U256::from(250u64)));
        assert_eq!(constraints.allowed_faucets().len(), 1);
        assert!(constraints.allowed_faucets().contains("0xfaucet"));
        assert_eq!(constraints.allowed_networks().len(), 2);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_args_parse_from_command_line() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            constraints: ConstraintsArgs,
        }

        let cli = Cli::try_parse_from([
            "m402",
            "--max-payment",
            "1000",
            "--allowed-network",
            "miden:testnet,miden:devnet",
            "--allowed-faucet",
            "0xfaucet",
        ])
        .unwrap();
        let constraints = PaymentConstraints::from(cli.constraints);
        assert_eq!(constraints.max_payment(), Some(U256::from(1000u64)));
        assert!(constraints.allowed_networks().contains("miden:devnet"));
        assert!(constraints.allowed_faucets().contains("0xfaucet"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_args_reject_non_decimal_max_payment() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            constraints: ConstraintsArgs,
        }

        for bad in ["0x10", "-5", "1e3"] {
            assert!(
                Cli::try_parse_from(["m402", "--max-payment", bad]).is_err(),
                "{bad} should be rejected"
            );
        }
    }
}
