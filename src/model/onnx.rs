//! ONNX Runtime inference. Input: [1, feature_dim] f32, output: fraud probability.
//! The session is built once at startup; a missing or unreadable artifact is
//! fatal there, never retried per request.

use super::{ensure_dim, RiskModel};
use crate::error::EngineError;
use crate::features::FeatureVector;
use ndarray::{Array2, CowArray, IxDyn};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::info;

static ORT_ENV: OnceLock<Arc<ort::Environment>> = OnceLock::new();

fn init_env() -> &'static Arc<ort::Environment> {
    ORT_ENV.get_or_init(|| {
        ort::Environment::builder()
            .with_name("fraudgate")
            .build()
            .expect("ORT environment")
            .into_arc()
    })
}

pub struct OnnxClassifier {
    session: ort::Session,
    feature_dim: usize,
}

impl OnnxClassifier {
    /// Load the fitted classifier. Fails with `ModelUnavailable` when the
    /// artifact is missing or invalid.
    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(EngineError::ModelUnavailable(format!(
                "classifier artifact not found at {}",
                path.display()
            )));
        }

        let session = ort::SessionBuilder::new(init_env())
            .and_then(|b| b.with_model_from_file(path))
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;

        info!(path = %path.display(), feature_dim, "classifier loaded");
        Ok(Self {
            session,
            feature_dim,
        })
    }
}

impl RiskModel for OnnxClassifier {
    fn score(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        ensure_dim(self.feature_dim, features)?;

        let row: Vec<f32> = features.as_slice().iter().map(|v| *v as f32).collect();
        let arr: CowArray<'_, f32, IxDyn> = Array2::from_shape_vec((1, self.feature_dim), row)
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?
            .into_dyn()
            .into();
        let input = ort::Value::from_array(self.session.allocator(), &arr)
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;

        let outputs = self
            .session
            .run(vec![input])
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;
        let out = outputs
            .first()
            .ok_or_else(|| EngineError::ModelUnavailable("classifier produced no output".into()))?;
        let tensor: ort::tensor::OrtOwnedTensor<'_, f32, IxDyn> = out
            .try_extract()
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;
        let view = tensor.view();

        // Binary classifiers export either [p_fraud] or [p_legit, p_fraud];
        // the fraud probability is the last element either way.
        let prob = view
            .iter()
            .last()
            .copied()
            .ok_or_else(|| EngineError::ModelUnavailable("classifier output empty".into()))?;
        Ok((prob as f64).clamp(0.0, 1.0))
    }
}
