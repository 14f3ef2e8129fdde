//! Response types for facilitator endpoints.

use serde::Deserialize;

/// Result of a facilitator `POST /verify` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    /// Whether the payment payload satisfies the requirements.
    pub is_valid: bool,
    /// Why verification failed, when `is_valid` is false.
    #[serde(default)]
    pub invalid_reason: Option<String>,
    /// The paying address, when the facilitator could recover it.
    #[serde(default)]
    pub payer: Option<String>,
}

/// Result of a facilitator `POST /settle` call.
///
/// The on-chain reference differs per family: EVM settlements report a
/// `transaction` hash, SVM settlements report a `signature`. Use
/// [`reference`](Self::reference) when the family does not matter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleOutcome {
    /// Whether settlement succeeded on chain.
    pub success: bool,
    /// Why settlement failed, when `success` is false.
    #[serde(default)]
    pub error_reason: Option<String>,
    /// EVM transaction hash.
    #[serde(default)]
    pub transaction: Option<String>,
    /// SVM transaction signature.
    #[serde(default)]
    pub signature: Option<String>,
    /// The network the settlement ran on.
    #[serde(default)]
    pub network: Option<String>,
    /// The paying address.
    #[serde(default)]
    pub payer: Option<String>,
}

impl SettleOutcome {
    /// The on-chain reference for this settlement, whichever family
    /// produced it.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.transaction
            .as_deref()
            .or(self.signature.as_deref())
    }
}

/// Result of a facilitator `GET /supported` call.
#[derive(Debug, Clone, Deserialize)]
pub struct SupportedResponse {
    /// The scheme/network pairs the facilitator can settle.
    pub kinds: Vec<SupportedKind>,
}

/// One scheme/network pair a facilitator supports.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedKind {
    /// Protocol version the pair speaks.
    pub x402_version: u8,
    /// Payment scheme name.
    pub scheme: String,
    /// Network id.
    pub network: String,
}
