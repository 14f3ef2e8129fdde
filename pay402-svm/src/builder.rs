//! Signed SPL token transfer transactions for exact-scheme payments.
//!
//! Unlike the EVM path, a Solana payment is a complete, on-chain-ready
//! transaction: the consumer is the fee payer and the only signer, and
//! the facilitator submits the bytes unmodified. Source and destination
//! token accounts are the associated token accounts of the consumer and
//! merchant for the network's USDC mint, derived locally. Replay
//! protection comes from the embedded recent blockhash, so no explicit
//! nonce is carried.

use solana_keypair::Keypair;
use solana_message::v0::Message as MessageV0;
use solana_message::VersionedMessage;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;
use std::str::FromStr;

use pay402::encoding::Base64Bytes;
use pay402::error::PaymentError;
use pay402::networks::{Family, NetworkRegistry};
use pay402::proto::{
    ExactPayload, ExactScheme, ExactSvmPayload, PaymentPayload, PaymentRequirements, V1,
};

use crate::rpc::SolanaRpc;

/// The SPL Associated Token Account program.
pub const ATA_PROGRAM_PUBKEY: Pubkey =
    solana_pubkey::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// USDC mints carry 6 decimals on every supported network.
pub const USDC_DECIMALS: u8 = 6;

/// Derives the associated token account of `owner` for `mint`.
#[must_use]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (ata, _) = Pubkey::find_program_address(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ATA_PROGRAM_PUBKEY,
    );
    ata
}

/// A signed Solana payment ready for the `X-PAYMENT` header.
#[derive(Debug, Clone)]
pub struct SignedSvmPayment {
    /// The complete payment payload.
    pub payload: PaymentPayload,
    /// The consumer public key that signed and pays the fee.
    pub payer: Pubkey,
}

/// Builds and signs exact-scheme USDC transfers on SVM networks.
///
/// Holds only a registry reference. The signing keypair is reconstructed
/// per call from the caller's key material and dropped when the call
/// returns; it is never cached, logged, or echoed in errors.
#[derive(Debug, Clone, Copy)]
pub struct SolanaPaymentBuilder<'a> {
    registry: &'a NetworkRegistry,
}

impl<'a> SolanaPaymentBuilder<'a> {
    /// Creates a builder over the given registry.
    #[must_use]
    pub const fn new(registry: &'a NetworkRegistry) -> Self {
        Self { registry }
    }

    /// Builds a signed transfer transaction answering `requirements`.
    ///
    /// `private_key` is the base58 encoding of a 64-byte ed25519 keypair.
    /// The transaction carries a single `transfer_checked` instruction
    /// moving exactly `maxAmountRequired` minor units between the
    /// consumer's and merchant's associated token accounts, compiled
    /// against a blockhash fetched from `rpc`.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::UnknownNetwork`] if the requirements name an
    ///   unregistered network.
    /// - [`PaymentError::Validation`] if the network is not an SVM
    ///   network, a requirements field does not parse, or the
    ///   transaction cannot be compiled or signed.
    /// - [`PaymentError::InvalidKey`] if `private_key` is not a valid
    ///   ed25519 keypair in base58.
    /// - [`PaymentError::Rpc`] if the blockhash fetch fails; retryable
    ///   with a fresh build.
    pub async fn build<R: SolanaRpc>(
        &self,
        requirements: &PaymentRequirements,
        private_key: &str,
        rpc: &R,
    ) -> Result<SignedSvmPayment, PaymentError> {
        let descriptor = self.registry.describe(&requirements.network)?;
        if descriptor.family != Family::Svm {
            return Err(PaymentError::validation(
                "network",
                format!(
                    "{} is a {} network, not svm",
                    descriptor.id, descriptor.family
                ),
            ));
        }

        let key_bytes = bs58::decode(private_key)
            .into_vec()
            .map_err(|_| PaymentError::invalid_key(Family::Svm))?;
        let keypair = Keypair::try_from(key_bytes.as_slice())
            .map_err(|_| PaymentError::invalid_key(Family::Svm))?;
        let payer = keypair.pubkey();

        let mint = Pubkey::from_str(&requirements.asset).map_err(|e| {
            PaymentError::validation("asset", format!("not a Solana pubkey: {e}"))
        })?;
        let pay_to = Pubkey::from_str(&requirements.pay_to).map_err(|e| {
            PaymentError::validation("payTo", format!("not a Solana pubkey: {e}"))
        })?;
        let amount: u64 = requirements.max_amount_required.parse().map_err(|e| {
            PaymentError::validation(
                "maxAmountRequired",
                format!("not a u64 integer string: {e}"),
            )
        })?;

        let source_ata = associated_token_address(&payer, &mint);
        let destination_ata = associated_token_address(&pay_to, &mint);

        let transfer = spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &source_ata,
            &mint,
            &destination_ata,
            &payer,
            &[],
            amount,
            USDC_DECIMALS,
        )
        .map_err(|e| PaymentError::validation("transaction", format!("transfer_checked: {e}")))?;

        let blockhash = rpc.latest_blockhash().await?;

        let message = MessageV0::try_compile(&payer, &[transfer], &[], blockhash)
            .map_err(|e| PaymentError::validation("transaction", format!("compile: {e}")))?;
        let transaction =
            VersionedTransaction::try_new(VersionedMessage::V0(message), &[&keypair])
                .map_err(|e| PaymentError::validation("transaction", format!("sign: {e}")))?;

        let bytes = bincode::serialize(&transaction)
            .map_err(|e| PaymentError::codec(format!("serialize transaction: {e}")))?;

        tracing::debug!(
            network = descriptor.id,
            %payer,
            amount,
            "built signed transfer transaction"
        );

        Ok(SignedSvmPayment {
            payload: PaymentPayload {
                x402_version: V1,
                scheme: ExactScheme,
                network: descriptor.id.to_owned(),
                payload: ExactPayload::Svm(ExactSvmPayload {
                    transaction: Base64Bytes::encode(&bytes).to_string(),
                }),
            },
            payer,
        })
    }
}
