//! Feature transformer: validated transaction → fixed 12-slot vector.

use super::{FeatureVector, FittedScaler, CHANNEL_SLOTS, NUMERIC_DIM};
use crate::config::FeaturesConfig;
use crate::transaction::{Channel, Transaction};
use chrono::{Datelike, Timelike};

pub struct FeatureTransformer {
    config: FeaturesConfig,
    scaler: FittedScaler,
}

impl FeatureTransformer {
    pub fn new(config: FeaturesConfig, scaler: FittedScaler) -> Self {
        Self { config, scaler }
    }

    /// Build the model input vector. Deterministic, no side effects.
    ///
    /// Numeric slot order (must match the fitted scaler and classifier):
    /// kyc_verified, account_age_days, amount, ln(1+amount), hour,
    /// weekday (Monday = 0), is_high_value.
    pub fn transform(&self, tx: &Transaction) -> FeatureVector {
        let amount = tx.transaction_amount;
        let numeric = [
            if tx.kyc_verified { 1.0 } else { 0.0 },
            tx.account_age_days as f64,
            amount,
            amount.ln_1p(),
            tx.timestamp.hour() as f64,
            tx.timestamp.weekday().num_days_from_monday() as f64,
            if amount > self.config.high_value_threshold {
                1.0
            } else {
                0.0
            },
        ];
        debug_assert_eq!(numeric.len(), NUMERIC_DIM);

        let mut values = Vec::with_capacity(NUMERIC_DIM + CHANNEL_SLOTS.len());
        for (i, v) in numeric.into_iter().enumerate() {
            values.push(self.scaler.apply(i, v));
        }

        let slot = match tx.channel {
            Channel::Atm => "ATM",
            Channel::Mobile => "Mobile",
            Channel::Pos => "POS",
            Channel::Web => "Web",
            // The encoder was fitted without an International category.
            Channel::International | Channel::Other => "Other",
        };
        for name in CHANNEL_SLOTS {
            values.push(if name == slot { 1.0 } else { 0.0 });
        }

        FeatureVector {
            transaction_id: tx.transaction_id.clone(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_DIM;
    use chrono::DateTime;

    fn tx(amount: f64, channel: Channel) -> Transaction {
        Transaction {
            transaction_id: "t1".into(),
            customer_id: "C1".into(),
            transaction_amount: amount,
            channel,
            account_age_days: 30,
            kyc_verified: true,
            timestamp: DateTime::parse_from_rfc3339("2025-06-18T14:30:00+00:00").unwrap(),
        }
    }

    fn transformer() -> FeatureTransformer {
        FeatureTransformer::new(FeaturesConfig::default(), FittedScaler::identity())
    }

    #[test]
    fn vector_has_contract_dim() {
        let fv = transformer().transform(&tx(100.0, Channel::Web));
        assert_eq!(fv.dim(), FEATURE_DIM);
    }

    #[test]
    fn numeric_slots_in_order() {
        let fv = transformer().transform(&tx(100.0, Channel::Web));
        assert_eq!(fv.values[0], 1.0); // kyc
        assert_eq!(fv.values[1], 30.0); // account age
        assert_eq!(fv.values[2], 100.0); // amount
        assert!((fv.values[3] - 101.0_f64.ln()).abs() < 1e-9); // ln(1+amount)
        assert_eq!(fv.values[4], 14.0); // hour
        assert_eq!(fv.values[5], 2.0); // 2025-06-18 is a Wednesday
        assert_eq!(fv.values[6], 0.0); // below high-value threshold
    }

    #[test]
    fn high_value_flag_set_above_threshold() {
        let fv = transformer().transform(&tx(60_000.0, Channel::Web));
        assert_eq!(fv.values[6], 1.0);
    }

    #[test]
    fn one_hot_channel_slots() {
        let fv = transformer().transform(&tx(100.0, Channel::Pos));
        // Slots: ATM, Mobile, Other, POS, Web
        assert_eq!(&fv.values[7..], &[0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn international_maps_to_other_slot() {
        let fv = transformer().transform(&tx(100.0, Channel::International));
        assert_eq!(&fv.values[7..], &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let t = tx(5_000.0, Channel::Mobile);
        let a = transformer().transform(&t);
        let b = transformer().transform(&t);
        assert_eq!(a.values, b.values);
    }
}
