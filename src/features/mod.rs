//! Deterministic transaction → feature vector mapping with fitted scaling.
//!
//! Layout is contract-fixed to match the classifier's training pipeline:
//! 7 scaled numeric features followed by 5 one-hot channel slots.

mod scaler;
mod transform;

pub use scaler::{FittedScaler, ScaleParam};
pub use transform::FeatureTransformer;

use serde::{Deserialize, Serialize};

/// Number of numeric features (kyc_verified, account_age_days, amount,
/// ln(1+amount), hour, weekday, is_high_value) in fixed order.
pub const NUMERIC_DIM: usize = 7;

/// One-hot channel slots, in the encoder's alphabetical order.
/// International and unknown channels fall into the Other slot.
pub const CHANNEL_SLOTS: [&str; 5] = ["ATM", "Mobile", "Other", "POS", "Web"];

/// Total model input width.
pub const FEATURE_DIM: usize = NUMERIC_DIM + CHANNEL_SLOTS.len();

/// Fixed-order model input vector for one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    pub transaction_id: String,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
