//! ERC-3009 `transferWithAuthorization` signing via EIP-712.
//!
//! An EVM payment is an off-chain meta-transaction: the consumer signs a
//! bounded-value, bounded-time transfer authorization and the facilitator
//! submits it on chain, paying gas. The signature covers the typed struct
//! below under the USDC domain; the facilitator reconstructs the struct
//! from the payload's authorization fields to verify it.

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolStruct, eip712_domain, sol};
use rand::Rng;
use std::str::FromStr;

use pay402::error::PaymentError;
use pay402::networks::{Family, NetworkRegistry};
use pay402::proto::{
    ExactEvmAuthorization, ExactEvmPayload, ExactPayload, ExactScheme, PaymentPayload,
    PaymentRequirements, TokenAmount, V1,
};
use pay402::timestamp::UnixTimestamp;

/// EIP-712 domain name shared by all Circle USDC deployments.
pub const USDC_EIP712_NAME: &str = "USD Coin";

/// EIP-712 domain version shared by all Circle USDC deployments.
pub const USDC_EIP712_VERSION: &str = "2";

/// Authorization validity window in seconds (`validBefore - validAfter`
/// lower bound is the epoch, so the window is measured from now).
pub const AUTHORIZATION_WINDOW_SECS: u64 = 3600;

sol! {
    /// The ERC-3009 typed struct covered by the authorization signature.
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
}

/// A signed EVM payment ready for the `X-PAYMENT` header.
#[derive(Debug, Clone)]
pub struct SignedEvmPayment {
    /// The complete payment payload.
    pub payload: PaymentPayload,
    /// The consumer address recovered from the signing key.
    pub payer: Address,
}

/// Signs exact-scheme USDC payments on EVM networks.
///
/// Holds only a registry reference. The signing key is taken per call and
/// dropped when the call returns; it is never cached, logged, or echoed
/// in errors.
#[derive(Debug, Clone, Copy)]
pub struct EvmAuthorizationSigner<'a> {
    registry: &'a NetworkRegistry,
}

impl<'a> EvmAuthorizationSigner<'a> {
    /// Creates a signer over the given registry.
    #[must_use]
    pub const fn new(registry: &'a NetworkRegistry) -> Self {
        Self { registry }
    }

    /// Signs a transfer authorization answering `requirements`.
    ///
    /// The authorization is valid from the epoch until now plus
    /// [`AUTHORIZATION_WINDOW_SECS`], transfers exactly
    /// `maxAmountRequired`, and carries a fresh random 32-byte nonce.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::UnknownNetwork`] if the requirements name an
    ///   unregistered network.
    /// - [`PaymentError::Validation`] if the network is not an EVM
    ///   network, a requirements field does not parse, or signing fails.
    /// - [`PaymentError::InvalidKey`] if `private_key` is not a valid
    ///   secp256k1 key in hex.
    pub async fn sign(
        &self,
        requirements: &PaymentRequirements,
        private_key: &str,
    ) -> Result<SignedEvmPayment, PaymentError> {
        let descriptor = self.registry.describe(&requirements.network)?;
        if descriptor.family != Family::Evm {
            return Err(PaymentError::validation(
                "network",
                format!(
                    "{} is a {} network, not evm",
                    descriptor.id, descriptor.family
                ),
            ));
        }
        let chain_id = descriptor.chain_id.ok_or_else(|| {
            PaymentError::validation("network", format!("{} has no chain id", descriptor.id))
        })?;

        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|_| PaymentError::invalid_key(Family::Evm))?;
        let payer = signer.address();

        let asset = Address::from_str(&requirements.asset).map_err(|e| {
            PaymentError::validation("asset", format!("not an EVM address: {e}"))
        })?;
        let pay_to = Address::from_str(&requirements.pay_to).map_err(|e| {
            PaymentError::validation("payTo", format!("not an EVM address: {e}"))
        })?;
        let value = TokenAmount::from_str(&requirements.max_amount_required).map_err(|e| {
            PaymentError::validation("maxAmountRequired", format!("not an integer string: {e}"))
        })?;

        let domain = eip712_domain! {
            name: USDC_EIP712_NAME,
            version: USDC_EIP712_VERSION,
            chain_id: chain_id,
            verifying_contract: asset,
        };

        let valid_after = UnixTimestamp::ZERO;
        let valid_before = UnixTimestamp::now() + AUTHORIZATION_WINDOW_SECS;
        let nonce: [u8; 32] = rand::rng().random();
        let nonce = B256::from(nonce);

        let authorization = ExactEvmAuthorization {
            from: payer,
            to: pay_to,
            value,
            valid_after,
            valid_before,
            nonce,
        };

        // Field values MUST match the authorization exactly; the
        // facilitator rebuilds this struct from the payload to verify
        // the signature.
        let transfer = TransferWithAuthorization {
            from: authorization.from,
            to: authorization.to,
            value: authorization.value.inner(),
            validAfter: U256::from(authorization.valid_after.as_secs()),
            validBefore: U256::from(authorization.valid_before.as_secs()),
            nonce: authorization.nonce,
        };

        let hash = transfer.eip712_signing_hash(&domain);
        let signature = alloy_signer::Signer::sign_hash(&signer, &hash)
            .await
            .map_err(|e| PaymentError::validation("signature", format!("signing failed: {e}")))?;

        tracing::debug!(
            network = descriptor.id,
            %payer,
            value = %authorization.value,
            "signed transfer authorization"
        );

        Ok(SignedEvmPayment {
            payload: PaymentPayload {
                x402_version: V1,
                scheme: ExactScheme,
                network: descriptor.id.to_owned(),
                payload: ExactPayload::Evm(ExactEvmPayload {
                    signature: signature.as_bytes().into(),
                    authorization,
                }),
            },
            payer,
        })
    }
}
