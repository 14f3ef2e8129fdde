//! Consumer-facing cost estimation.
//!
//! Computes the total cost of a payment and who carries the network fee.
//! The figures are a fixed policy table per chain family, not measured
//! on-chain: on EVM networks the facilitator submits the settlement
//! transaction and absorbs gas, on SVM networks the consumer is the
//! transaction fee payer.

use rust_decimal::Decimal;

use crate::error::PaymentError;
use crate::networks::{Family, NetworkRegistry};

/// USDC minor units per dollar (6 decimals).
const USDC_SCALE: u32 = 6;

/// Who pays the network fee for a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePayer {
    /// The consumer pays the fee on top of the transferred amount.
    Consumer,
    /// The facilitator absorbs the fee; the consumer pays only the amount.
    Facilitator,
}

/// Cost attribution for one payment on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostBreakdown {
    /// The network the estimate is for.
    pub network: String,
    /// The network's chain family.
    pub family: Family,
    /// The transferred amount in USD.
    pub payment_amount_usd: Decimal,
    /// The flat network fee in USD.
    pub network_fee_usd: Decimal,
    /// What the consumer pays in total, in USD.
    pub total_cost_to_consumer_usd: Decimal,
    /// Who carries the network fee.
    pub fee_payer: FeePayer,
    /// Rough settlement latency label, not measured.
    pub settlement_estimate: &'static str,
}

/// Estimates consumer-facing cost per network. Pure lookup, no I/O.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator<'a> {
    registry: &'a NetworkRegistry,
}

impl<'a> CostEstimator<'a> {
    /// Creates an estimator over the given registry.
    #[must_use]
    pub const fn new(registry: &'a NetworkRegistry) -> Self {
        Self { registry }
    }

    /// Estimates the cost of paying `amount_minor_units` on `network_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::UnknownNetwork`] for an unregistered id,
    /// or [`PaymentError::Validation`] if the amount is not a
    /// non-negative integer string.
    pub fn estimate(
        &self,
        network_id: &str,
        amount_minor_units: &str,
    ) -> Result<CostBreakdown, PaymentError> {
        let descriptor = self.registry.describe(network_id)?;
        let minor_units: u64 = amount_minor_units
            .parse()
            .map_err(|_| {
                PaymentError::validation(
                    "maxAmountRequired",
                    format!("\"{amount_minor_units}\" is not a non-negative integer string"),
                )
            })?;
        let payment_amount_usd = Decimal::from_i128_with_scale(i128::from(minor_units), USDC_SCALE);

        let (network_fee_usd, fee_payer, settlement_estimate) = match descriptor.family {
            Family::Evm => {
                // Avalanche gas runs an order of magnitude above the
                // other supported EVM networks.
                let fee = match descriptor.id {
                    "avalanche" | "avalanche-fuji" => Decimal::new(1, 2),
                    _ => Decimal::new(1, 3),
                };
                (fee, FeePayer::Facilitator, "~2 seconds")
            }
            Family::Svm => (Decimal::new(5, 6), FeePayer::Consumer, "~400ms"),
        };

        let total_cost_to_consumer_usd = match fee_payer {
            FeePayer::Consumer => payment_amount_usd + network_fee_usd,
            FeePayer::Facilitator => payment_amount_usd,
        };

        Ok(CostBreakdown {
            network: descriptor.id.to_owned(),
            family: descriptor.family,
            payment_amount_usd,
            network_fee_usd,
            total_cost_to_consumer_usd,
            fee_payer,
            settlement_estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn solana_consumer_pays_the_fee() {
        let registry = NetworkRegistry::builtin();
        let estimator = CostEstimator::new(&registry);
        let breakdown = estimator.estimate("solana", "1000000").unwrap();
        assert_eq!(breakdown.payment_amount_usd, Decimal::from_str("1.000000").unwrap());
        assert_eq!(breakdown.network_fee_usd, Decimal::from_str("0.000005").unwrap());
        assert_eq!(
            breakdown.total_cost_to_consumer_usd,
            Decimal::from_str("1.000005").unwrap()
        );
        assert_eq!(breakdown.fee_payer, FeePayer::Consumer);
        assert_eq!(breakdown.settlement_estimate, "~400ms");
    }

    #[test]
    fn avalanche_facilitator_absorbs_gas() {
        let registry = NetworkRegistry::builtin();
        let estimator = CostEstimator::new(&registry);
        let breakdown = estimator.estimate("avalanche", "100000").unwrap();
        assert_eq!(breakdown.network_fee_usd, Decimal::from_str("0.01").unwrap());
        assert_eq!(
            breakdown.total_cost_to_consumer_usd,
            Decimal::from_str("0.10").unwrap()
        );
        assert_eq!(breakdown.fee_payer, FeePayer::Facilitator);
        assert_eq!(breakdown.settlement_estimate, "~2 seconds");
    }

    #[test]
    fn base_uses_the_low_fee_tier() {
        let registry = NetworkRegistry::builtin();
        let estimator = CostEstimator::new(&registry);
        let breakdown = estimator.estimate("base", "100000").unwrap();
        assert_eq!(breakdown.network_fee_usd, Decimal::from_str("0.001").unwrap());
    }

    #[test]
    fn total_never_undercuts_the_amount() {
        let registry = NetworkRegistry::builtin();
        let estimator = CostEstimator::new(&registry);
        for descriptor in registry.list() {
            let breakdown = estimator.estimate(descriptor.id, "123456").unwrap();
            assert!(
                breakdown.total_cost_to_consumer_usd >= breakdown.payment_amount_usd,
                "{} total below amount",
                descriptor.id
            );
            match descriptor.family {
                Family::Evm => assert_eq!(
                    breakdown.total_cost_to_consumer_usd,
                    breakdown.payment_amount_usd
                ),
                Family::Svm => assert!(
                    breakdown.total_cost_to_consumer_usd > breakdown.payment_amount_usd
                ),
            }
        }
    }

    #[test]
    fn bad_inputs_fail_structured() {
        let registry = NetworkRegistry::builtin();
        let estimator = CostEstimator::new(&registry);
        assert_eq!(
            estimator.estimate("not-a-real-network", "1").unwrap_err().kind(),
            "unknown_network"
        );
        assert_eq!(
            estimator.estimate("base", "1.5").unwrap_err().kind(),
            "validation"
        );
    }
}
