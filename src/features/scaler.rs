//! Fitted zero-mean unit-variance scaling parameters, loaded once from the
//! training pipeline's exported JSON artifact.

use super::NUMERIC_DIM;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Mean/std pair fitted for one numeric feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleParam {
    pub mean: f64,
    pub std: f64,
}

/// Per-feature fitted scaling parameters. A feature whose slot is `None`
/// (or whose fitted std is zero) passes through unscaled; that is the
/// documented fallback, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedScaler {
    pub features: Vec<Option<ScaleParam>>,
}

impl FittedScaler {
    /// Identity scaler: every feature passes through unscaled.
    pub fn identity() -> Self {
        Self {
            features: vec![None; NUMERIC_DIM],
        }
    }

    /// Load from the exported JSON artifact. A missing file yields the
    /// identity scaler with a warning, mirroring how other fitted
    /// artifacts degrade rather than abort.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "scaler artifact not found; features pass through unscaled");
            return Self::identity();
        }
        match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|data| serde_json::from_str::<FittedScaler>(&data).map_err(|e| e.to_string()))
        {
            Ok(mut s) => {
                s.features.resize(NUMERIC_DIM, None);
                s
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "scaler artifact unreadable; features pass through unscaled");
                Self::identity()
            }
        }
    }

    /// Scale the numeric feature at `index`.
    pub fn apply(&self, index: usize, value: f64) -> f64 {
        match self.features.get(index).copied().flatten() {
            Some(p) if p.std != 0.0 => (value - p.mean) / p.std,
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_with_fitted_params() {
        let scaler = FittedScaler {
            features: vec![Some(ScaleParam { mean: 10.0, std: 2.0 }); NUMERIC_DIM],
        };
        assert_eq!(scaler.apply(0, 14.0), 2.0);
    }

    #[test]
    fn missing_param_passes_through() {
        let scaler = FittedScaler::identity();
        assert_eq!(scaler.apply(3, 42.5), 42.5);
    }

    #[test]
    fn zero_std_passes_through() {
        let scaler = FittedScaler {
            features: vec![Some(ScaleParam { mean: 5.0, std: 0.0 }); NUMERIC_DIM],
        };
        assert_eq!(scaler.apply(1, 7.0), 7.0);
    }

    #[test]
    fn load_missing_file_is_identity() {
        let s = FittedScaler::load(std::path::Path::new("nonexistent-scaler.json"));
        assert!(s.features.iter().all(Option::is_none));
    }
}
