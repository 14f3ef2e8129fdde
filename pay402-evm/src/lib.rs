//! EVM payment signing for the x402 exact scheme.
//!
//! Produces EIP-712 signed ERC-3009 `transferWithAuthorization` payloads
//! for USDC on EVM networks. No chain I/O happens here; the facilitator
//! submits the authorization and pays gas.

pub mod signer;

pub use signer::{
    AUTHORIZATION_WINDOW_SECS, EvmAuthorizationSigner, SignedEvmPayment, USDC_EIP712_NAME,
    USDC_EIP712_VERSION,
};
