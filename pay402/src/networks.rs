//! Network registry for supported blockchains.
//!
//! Maps a network id (e.g. `"base"`, `"solana-devnet"`) to a
//! [`NetworkDescriptor`]: the chain family, the EVM chain id or the SVM
//! RPC endpoint, and the canonical USDC deployment on that network.
//!
//! The registry is read-only after construction and is safely shared
//! across concurrent signing calls without locking. Build one with
//! [`NetworkRegistry::builtin`] at process start.

use std::collections::HashMap;
use std::fmt;

use crate::error::PaymentError;

/// The transaction model of a chain.
///
/// Dispatch between signers is driven by this tag, never by payload
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// EVM account chains signed via EIP-712 typed-data authorizations.
    Evm,
    /// Solana-style chains paid with a fully signed versioned transaction.
    Svm,
}

impl Family {
    /// Lowercase name used in error messages and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::Svm => "svm",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one supported network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    /// Network id used on the wire (e.g. `"base-sepolia"`).
    pub id: &'static str,
    /// Chain family, selects the signing model.
    pub family: Family,
    /// EIP-155 chain id. `None` for SVM networks.
    pub chain_id: Option<u64>,
    /// Default RPC endpoint for blockhash fetches. `None` for EVM
    /// networks (the EVM signer performs no chain I/O).
    pub rpc_endpoint: Option<String>,
    /// Canonical USDC contract address (EVM) or mint (SVM).
    pub usdc_asset: &'static str,
    /// Human-readable name for display.
    pub display_name: &'static str,
}

impl NetworkDescriptor {
    const fn evm(
        id: &'static str,
        chain_id: u64,
        usdc_asset: &'static str,
        display_name: &'static str,
    ) -> Self {
        Self {
            id,
            family: Family::Evm,
            chain_id: Some(chain_id),
            rpc_endpoint: None,
            usdc_asset,
            display_name,
        }
    }

    fn svm(
        id: &'static str,
        rpc_endpoint: &str,
        usdc_asset: &'static str,
        display_name: &'static str,
    ) -> Self {
        Self {
            id,
            family: Family::Svm,
            chain_id: None,
            rpc_endpoint: Some(rpc_endpoint.to_owned()),
            usdc_asset,
            display_name,
        }
    }
}

/// The built-in network set, in display order.
fn builtin_networks() -> Vec<NetworkDescriptor> {
    vec![
        // USDC deployments below are the native Circle contracts.
        // Verify: https://developers.circle.com/stablecoins/usdc-contract-addresses
        NetworkDescriptor::evm(
            "base",
            8453,
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            "Base",
        ),
        NetworkDescriptor::evm(
            "base-sepolia",
            84532,
            "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            "Base Sepolia",
        ),
        NetworkDescriptor::evm(
            "polygon",
            137,
            "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359",
            "Polygon PoS",
        ),
        NetworkDescriptor::evm(
            "polygon-amoy",
            80002,
            "0x41E94Eb019C0762f9Bfcf9Fb1E58725BfB0e7582",
            "Polygon Amoy",
        ),
        NetworkDescriptor::evm(
            "avalanche",
            43114,
            "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E",
            "Avalanche C-Chain",
        ),
        NetworkDescriptor::evm(
            "avalanche-fuji",
            43113,
            "0x5425890298aed601595a70AB815c96711a31Bc65",
            "Avalanche Fuji",
        ),
        NetworkDescriptor::svm(
            "solana",
            "https://api.mainnet-beta.solana.com",
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "Solana",
        ),
        NetworkDescriptor::svm(
            "solana-devnet",
            "https://api.devnet.solana.com",
            "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
            "Solana Devnet",
        ),
    ]
}

/// Read-only lookup from network id to [`NetworkDescriptor`].
///
/// Iteration order via [`list`](Self::list) is insertion order, stable
/// for display.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<NetworkDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl NetworkRegistry {
    /// Creates a registry from a descriptor list.
    ///
    /// Later entries with a duplicate id shadow earlier ones in lookup
    /// but keep their list position.
    #[must_use]
    pub fn new(networks: Vec<NetworkDescriptor>) -> Self {
        let index = networks
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        Self { networks, index }
    }

    /// Creates a registry with the built-in network set.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_networks())
    }

    /// Creates the built-in registry with SVM RPC endpoints overridable
    /// via `SOLANA_RPC_URL` and `SOLANA_DEVNET_RPC_URL`.
    #[must_use]
    pub fn builtin_from_env() -> Self {
        let mut registry = Self::builtin();
        for (id, var) in [
            ("solana", "SOLANA_RPC_URL"),
            ("solana-devnet", "SOLANA_DEVNET_RPC_URL"),
        ] {
            if let Ok(url) = std::env::var(var) {
                if !url.is_empty() {
                    // Builtin ids always resolve.
                    let _ = registry.set_rpc_endpoint(id, url);
                }
            }
        }
        registry
    }

    /// Looks up the descriptor for a network id.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::UnknownNetwork`] if the id is not
    /// registered.
    pub fn describe(&self, network_id: &str) -> Result<&NetworkDescriptor, PaymentError> {
        self.index
            .get(network_id)
            .map(|&i| &self.networks[i])
            .ok_or_else(|| PaymentError::unknown_network(network_id))
    }

    /// All registered networks in insertion order.
    #[must_use]
    pub fn list(&self) -> &[NetworkDescriptor] {
        &self.networks
    }

    /// Overrides the RPC endpoint of a registered network.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::UnknownNetwork`] if the id is not
    /// registered.
    pub fn set_rpc_endpoint(
        &mut self,
        network_id: &str,
        url: impl Into<String>,
    ) -> Result<(), PaymentError> {
        let i = *self
            .index
            .get(network_id)
            .ok_or_else(|| PaymentError::unknown_network(network_id))?;
        self.networks[i].rpc_endpoint = Some(url.into());
        Ok(())
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_resolve() {
        let registry = NetworkRegistry::builtin();
        for id in [
            "base",
            "base-sepolia",
            "polygon",
            "polygon-amoy",
            "avalanche",
            "avalanche-fuji",
            "solana",
            "solana-devnet",
        ] {
            let descriptor = registry.describe(id).unwrap();
            assert_eq!(descriptor.id, id);
        }
    }

    #[test]
    fn unknown_network_fails() {
        let registry = NetworkRegistry::builtin();
        let err = registry.describe("not-a-real-network").unwrap_err();
        assert_eq!(err.kind(), "unknown_network");
    }

    #[test]
    fn list_preserves_insertion_order() {
        let registry = NetworkRegistry::builtin();
        let ids: Vec<&str> = registry.list().iter().map(|n| n.id).collect();
        assert_eq!(ids.first(), Some(&"base"));
        assert_eq!(ids.last(), Some(&"solana-devnet"));
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn family_split_matches_signing_model() {
        let registry = NetworkRegistry::builtin();
        let base = registry.describe("base").unwrap();
        assert_eq!(base.family, Family::Evm);
        assert_eq!(base.chain_id, Some(8453));
        assert!(base.rpc_endpoint.is_none());

        let solana = registry.describe("solana").unwrap();
        assert_eq!(solana.family, Family::Svm);
        assert!(solana.chain_id.is_none());
        assert!(solana.rpc_endpoint.is_some());
    }

    #[test]
    fn rpc_endpoint_override() {
        let mut registry = NetworkRegistry::builtin();
        registry
            .set_rpc_endpoint("solana-devnet", "http://localhost:8899")
            .unwrap();
        let descriptor = registry.describe("solana-devnet").unwrap();
        assert_eq!(descriptor.rpc_endpoint.as_deref(), Some("http://localhost:8899"));

        assert!(registry.set_rpc_endpoint("nope", "http://x").is_err());
    }
}
