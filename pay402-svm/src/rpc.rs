//! RPC access needed to build a Solana payment.
//!
//! Building a transaction needs exactly one chain read: a recent
//! blockhash. [`SolanaRpc`] abstracts that read so the builder can run
//! against an injected connection (one long-lived client per endpoint,
//! shared across payments) and tests can run against a stub with no
//! network at all.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_message::Hash;

use pay402::error::PaymentError;

/// Source of recent blockhashes for transaction building.
pub trait SolanaRpc: Send + Sync {
    /// Fetches a recent blockhash at the connection's commitment level.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Rpc`] if the node is unreachable or
    /// responds with an error. RPC failures are retryable with a fresh
    /// build attempt.
    fn latest_blockhash(&self) -> impl Future<Output = Result<Hash, PaymentError>> + Send;
}

impl SolanaRpc for RpcClient {
    async fn latest_blockhash(&self) -> Result<Hash, PaymentError> {
        self.get_latest_blockhash()
            .await
            .map_err(|e| PaymentError::rpc(format!("get_latest_blockhash: {e}")))
    }
}

/// Connects to a Solana RPC endpoint at finalized commitment.
///
/// A finalized blockhash stays valid for the full ~60 second blockhash
/// window, which matters because the transaction is relayed through the
/// merchant and facilitator before submission. Reuse the returned client
/// across payments to the same endpoint.
#[must_use]
pub fn connect_finalized(url: impl Into<String>) -> RpcClient {
    RpcClient::new_with_commitment(url.into(), CommitmentConfig::finalized())
}
