//! Risk model adapter around an already-fitted binary classifier.

mod onnx;

pub use onnx::OnnxClassifier;

use crate::error::EngineError;
use crate::features::FeatureVector;

/// Capability interface over the fitted classifier. Implementations are
/// pure after construction and safe for unlimited concurrent invocation.
pub trait RiskModel: Send + Sync {
    /// Fraud probability in [0, 1] for one feature vector.
    fn score(&self, features: &FeatureVector) -> Result<f64, EngineError>;
}

/// Refuse scoring when the transformer and the fitted artifact disagree on
/// the feature contract; never truncate or pad.
pub fn ensure_dim(expected: usize, features: &FeatureVector) -> Result<(), EngineError> {
    if features.dim() != expected {
        return Err(EngineError::ModelUnavailable(format!(
            "feature vector has {} values, classifier expects {expected}",
            features.dim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(dim: usize) -> FeatureVector {
        FeatureVector {
            transaction_id: "t1".into(),
            values: vec![0.0; dim],
        }
    }

    #[test]
    fn dim_mismatch_fails_fast() {
        let err = ensure_dim(12, &vector(7)).unwrap_err();
        match err {
            EngineError::ModelUnavailable(msg) => {
                assert!(msg.contains("7"));
                assert!(msg.contains("12"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn matching_dim_passes() {
        assert!(ensure_dim(12, &vector(12)).is_ok());
    }
}
