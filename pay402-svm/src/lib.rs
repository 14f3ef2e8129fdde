//! Solana payment signing for the x402 exact scheme.
//!
//! Builds fully signed SPL token transfer transactions for USDC on SVM
//! networks. The only chain I/O is a recent blockhash fetch, abstracted
//! behind [`rpc::SolanaRpc`] so a single connection can be shared across
//! payments and tests can inject a stub.

pub mod builder;
pub mod rpc;

pub use builder::{
    ATA_PROGRAM_PUBKEY, SignedSvmPayment, SolanaPaymentBuilder, USDC_DECIMALS,
    associated_token_address,
};
pub use rpc::{SolanaRpc, connect_finalized};
