//! Builder for canonical payment requirements.
//!
//! Assembles the [`PaymentRequirements`] object a merchant publishes in a
//! 402 response. The asset always comes from the network registry, never
//! from caller input, so a well-formed requirements object is consistent
//! with the network's canonical USDC deployment by construction. The
//! [`verify_asset`](PaymentRequirementsBuilder::verify_asset) guard
//! re-checks that invariant for requirements that arrive from elsewhere.

use crate::error::PaymentError;
use crate::networks::NetworkRegistry;
use crate::proto::{ExactScheme, PaymentRequirements};

/// Default MIME type when the merchant does not specify one.
pub const DEFAULT_MIME_TYPE: &str = "application/json";

/// Default merchant handshake timeout in seconds.
///
/// Governs how long the merchant waits for the handshake to complete; it
/// is independent of the EVM authorization validity window.
pub const DEFAULT_MAX_TIMEOUT_SECONDS: u64 = 300;

/// Builds [`PaymentRequirements`] from merchant inputs and a registry
/// lookup. Pure, no I/O.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRequirementsBuilder<'a> {
    registry: &'a NetworkRegistry,
}

impl<'a> PaymentRequirementsBuilder<'a> {
    /// Creates a builder over the given registry.
    #[must_use]
    pub const fn new(registry: &'a NetworkRegistry) -> Self {
        Self { registry }
    }

    /// Builds requirements for an exact-amount USDC payment.
    ///
    /// `amount_minor_units` is a base-10 integer string in 6-decimal
    /// USDC minor units. `mime_type` defaults to `"application/json"`.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::UnknownNetwork`] if `network_id` is not registered.
    /// - [`PaymentError::Validation`] if the amount is not a non-negative
    ///   integer string, or `pay_to`/`resource` is empty.
    pub fn build(
        &self,
        network_id: &str,
        amount_minor_units: &str,
        pay_to: &str,
        resource: &str,
        description: &str,
        mime_type: Option<&str>,
    ) -> Result<PaymentRequirements, PaymentError> {
        let descriptor = self.registry.describe(network_id)?;

        if amount_minor_units.is_empty()
            || !amount_minor_units.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PaymentError::validation(
                "maxAmountRequired",
                format!("\"{amount_minor_units}\" is not a non-negative integer string"),
            ));
        }
        if pay_to.is_empty() {
            return Err(PaymentError::validation("payTo", "must not be empty"));
        }
        if resource.is_empty() {
            return Err(PaymentError::validation("resource", "must not be empty"));
        }

        let requirements = PaymentRequirements {
            scheme: ExactScheme,
            network: descriptor.id.to_owned(),
            max_amount_required: amount_minor_units.to_owned(),
            resource: resource.to_owned(),
            description: description.to_owned(),
            mime_type: mime_type.unwrap_or(DEFAULT_MIME_TYPE).to_owned(),
            pay_to: pay_to.to_owned(),
            max_timeout_seconds: DEFAULT_MAX_TIMEOUT_SECONDS,
            asset: descriptor.usdc_asset.to_owned(),
        };
        self.verify_asset(&requirements)?;
        tracing::debug!(
            network = descriptor.id,
            amount = amount_minor_units,
            asset = descriptor.usdc_asset,
            "built payment requirements"
        );
        Ok(requirements)
    }

    /// Checks that the requirements' asset matches the registry's USDC
    /// deployment for its network.
    ///
    /// [`build`](Self::build) cannot produce a mismatch; this guards
    /// requirements received from the outside and protects against
    /// registry misconfiguration.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Validation`] on mismatch, or
    /// [`PaymentError::UnknownNetwork`] if the network is not registered.
    pub fn verify_asset(&self, requirements: &PaymentRequirements) -> Result<(), PaymentError> {
        let descriptor = self.registry.describe(&requirements.network)?;
        if requirements.asset == descriptor.usdc_asset {
            Ok(())
        } else {
            Err(PaymentError::validation(
                "asset",
                format!(
                    "\"{}\" is not the canonical USDC asset on {}",
                    requirements.asset, requirements.network
                ),
            ))
        }
    }
}
