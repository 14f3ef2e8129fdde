//! Core types for an x402 USDC payment authorization engine.
//!
//! This crate carries the chain-agnostic pieces of the HTTP 402 payment
//! handshake: the merchant publishes [`proto::PaymentRequirements`] in a
//! 402 response, the consumer answers with a signed
//! [`proto::PaymentPayload`] in the `X-PAYMENT` header, and a facilitator
//! verifies and settles the payment on chain. Chain-specific signing
//! lives in separate crates (`pay402-evm`, `pay402-svm`); the facilitator
//! HTTP client lives in `pay402-http`.
//!
//! # Modules
//!
//! - [`encoding`] - Base64/JSON codec for the `X-PAYMENT` header
//! - [`error`] - The closed [`error::PaymentError`] taxonomy
//! - [`estimate`] - Consumer-facing cost estimation per network
//! - [`networks`] - Registry of supported networks and USDC deployments
//! - [`proto`] - Wire format types for requirements and payloads
//! - [`requirements`] - Builder for canonical payment requirements
//! - [`timestamp`] - String-serialized Unix timestamps for validity windows

pub mod encoding;
pub mod error;
pub mod estimate;
pub mod networks;
pub mod proto;
pub mod requirements;
pub mod timestamp;
