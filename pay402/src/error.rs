//! Error taxonomy for payment operations.
//!
//! Every fallible operation in the engine fails with a [`PaymentError`],
//! a closed set of structured kinds. Errors carry a machine-readable
//! [`kind`](PaymentError::kind) plus per-kind fields and never expose
//! stack traces or key material to callers.

use crate::networks::Family;

/// Structured error for payment requirement, signing, codec, and
/// facilitator operations.
///
/// The set of kinds is closed: callers can match exhaustively and decide
/// retry policy per kind. Only [`PaymentError::Rpc`] is retryable (with a
/// fresh signing attempt, since the blockhash context changes).
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The network id is not present in the registry.
    #[error("unknown network \"{network}\"")]
    UnknownNetwork {
        /// The unresolved network id.
        network: String,
    },

    /// A requirements field is malformed or violates an invariant.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The signing key could not be parsed for the target chain family.
    ///
    /// Deliberately carries no key bytes; only the family it failed for.
    #[error("signing key is not a valid {family} key")]
    InvalidKey {
        /// The chain family the key was parsed for.
        family: Family,
    },

    /// A chain-node RPC call failed or timed out.
    #[error("rpc request failed: {message}")]
    Rpc {
        /// Transport or node error description.
        message: String,
    },

    /// The transport envelope could not be decoded.
    #[error("malformed payment header: {message}")]
    Codec {
        /// Base64 or JSON decode failure description.
        message: String,
    },

    /// The facilitator returned a non-success response.
    ///
    /// The reason is propagated verbatim; settlement is not idempotent,
    /// so the caller decides whether to retry.
    #[error("facilitator error: {reason}")]
    Facilitator {
        /// The facilitator's reason, unmodified.
        reason: String,
    },
}

impl PaymentError {
    /// Creates an [`PaymentError::UnknownNetwork`] for the given id.
    pub fn unknown_network(network: impl Into<String>) -> Self {
        Self::UnknownNetwork {
            network: network.into(),
        }
    }

    /// Creates a [`PaymentError::Validation`] for a field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates an [`PaymentError::InvalidKey`] for a chain family.
    #[must_use]
    pub const fn invalid_key(family: Family) -> Self {
        Self::InvalidKey { family }
    }

    /// Creates a [`PaymentError::Rpc`].
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc {
            message: message.into(),
        }
    }

    /// Creates a [`PaymentError::Codec`].
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates a [`PaymentError::Facilitator`].
    pub fn facilitator(reason: impl Into<String>) -> Self {
        Self::Facilitator {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind string for boundary reporting.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownNetwork { .. } => "unknown_network",
            Self::Validation { .. } => "validation",
            Self::InvalidKey { .. } => "invalid_key",
            Self::Rpc { .. } => "rpc",
            Self::Codec { .. } => "codec",
            Self::Facilitator { .. } => "facilitator",
        }
    }

    /// Whether retrying the whole operation can succeed.
    ///
    /// Only RPC failures are transient; the retry must be a fresh signing
    /// attempt since the previous blockhash context is stale.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Rpc { .. })
    }
}
