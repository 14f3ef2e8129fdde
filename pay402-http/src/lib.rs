//! HTTP client for remote x402 facilitator services.
//!
//! Wraps the facilitator's verify/settle/supported/health/stats
//! endpoints over `reqwest`, accepting both direct and
//! `{ success, data }`-enveloped response bodies.

pub mod facilitator;
pub mod types;

pub use facilitator::{DEFAULT_FACILITATOR_URL, FacilitatorClient, FacilitatorConfig};
pub use types::{SettleOutcome, SupportedKind, SupportedResponse, VerifyOutcome};
