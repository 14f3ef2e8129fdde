//! Wire format types for x402 payment messages.
//!
//! Defines the JSON shapes carried in the HTTP 402 handshake: the
//! [`PaymentRequirements`] a merchant publishes and the [`PaymentPayload`]
//! a consumer answers with in the `X-PAYMENT` header. All types serialize
//! with camelCase field names; monetary amounts are base-10 integer
//! strings in 6-decimal USDC minor units (`"10000"` = $0.01).
//!
//! The payload body is a tagged union over chain families: an EIP-712
//! transfer authorization for EVM chains, a fully signed serialized
//! transaction for SVM chains. The discriminant on the wire is structural
//! (the two shapes share no fields); in code, dispatch goes through the
//! resolved network's [`Family`](crate::networks::Family), never through
//! payload shape.

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::timestamp::UnixTimestamp;

/// Protocol version marker parameterized by its numeric value.
///
/// Serializes as a bare integer and rejects mismatched values on
/// deserialization.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version<const N: u8>;

impl<const N: u8> Version<N> {
    /// The numeric value of this protocol version.
    pub const VALUE: u8 = N;
}

impl<const N: u8> fmt::Display for Version<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{N}")
    }
}

impl<const N: u8> Serialize for Version<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(N)
    }
}

impl<'de, const N: u8> Deserialize<'de> for Version<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = u8::deserialize(deserializer)?;
        if v == N {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected version {N}, got {v}"
            )))
        }
    }
}

/// Version marker for x402 protocol version 1.
pub type X402Version1 = Version<1>;

/// Convenience constant for constructing V1 messages.
pub const V1: X402Version1 = Version;

/// Marker for the `"exact"` payment scheme.
///
/// The engine implements only the exact-amount scheme; the marker
/// serializes as the string `"exact"` and rejects anything else.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExactScheme;

impl ExactScheme {
    /// The scheme identifier on the wire.
    pub const NAME: &'static str = "exact";
}

impl fmt::Display for ExactScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAME)
    }
}

impl Serialize for ExactScheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(Self::NAME)
    }
}

impl<'de> Deserialize<'de> for ExactScheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == Self::NAME {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected scheme \"exact\", got \"{s}\""
            )))
        }
    }
}

/// A token amount in the asset's smallest unit, serialized as a decimal
/// string (`"1000000"` = 1 USDC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    /// The inner 256-bit value.
    #[must_use]
    pub const fn inner(&self) -> U256 {
        self.0
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl FromStr for TokenAmount {
    type Err = <U256 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str(s).map(Self)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Payment terms published by a merchant in a 402 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// The payment scheme (always `"exact"`).
    pub scheme: ExactScheme,
    /// The network id (e.g. `"base-sepolia"`).
    pub network: String,
    /// Amount required, in USDC minor units as a decimal string.
    pub max_amount_required: String,
    /// The resource URL being paid for.
    pub resource: String,
    /// Human-readable description of the resource.
    pub description: String,
    /// MIME type of the resource.
    pub mime_type: String,
    /// The merchant's receiving address.
    pub pay_to: String,
    /// Merchant handshake timeout in seconds.
    pub max_timeout_seconds: u64,
    /// The USDC contract address or mint on `network`.
    pub asset: String,
}

/// A bounded-value, bounded-time EVM transfer authorization.
///
/// These are the exact fields covered by the EIP-712 signature; the
/// facilitator reconstructs the typed struct from them to verify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactEvmAuthorization {
    /// The consumer account authorizing the transfer.
    pub from: Address,
    /// The merchant's receiving address.
    pub to: Address,
    /// Transfer value in the token's smallest unit.
    pub value: TokenAmount,
    /// Authorization is invalid before this time (inclusive).
    pub valid_after: UnixTimestamp,
    /// Authorization expires at this time (exclusive).
    pub valid_before: UnixTimestamp,
    /// Unique 32-byte replay-protection nonce, fresh per payload.
    pub nonce: B256,
}

/// EVM payment payload: an off-chain meta-transaction authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactEvmPayload {
    /// EIP-712 signature over the authorization (65 bytes, hex).
    pub signature: Bytes,
    /// The structured data that was signed.
    pub authorization: ExactEvmAuthorization,
}

/// SVM payment payload: an on-chain-ready signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactSvmPayload {
    /// Base64 of the bincode-serialized signed versioned transaction.
    pub transaction: String,
}

/// Chain-family payload union.
///
/// Untagged on the wire: the EVM and SVM shapes share no fields, so the
/// variant is recovered structurally on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExactPayload {
    /// EIP-712 transfer authorization.
    Evm(ExactEvmPayload),
    /// Signed serialized Solana transaction.
    Svm(ExactSvmPayload),
}

/// A signed payment answering a merchant's requirements.
///
/// Created once per payment attempt and never mutated after signing;
/// any mutation invalidates the signature (EVM) or the transaction
/// signature (SVM).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version (always 1).
    pub x402_version: X402Version1,
    /// The payment scheme (always `"exact"`).
    pub scheme: ExactScheme,
    /// The network id the payment targets.
    pub network: String,
    /// The chain-family-specific signed payload.
    pub payload: ExactPayload,
}
