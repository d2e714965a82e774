//! Engine configuration. Fitted artifacts (model, scaler) are supplied paths,
//! loaded once at startup and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fitted model artifacts
    pub artifacts: ArtifactsConfig,
    /// Feature transformation parameters
    pub features: FeaturesConfig,
    /// Business rule thresholds
    pub rules: RulesConfig,
    /// Score fusion
    pub fusion: FusionConfig,
    /// Alert persistence
    pub alerts: AlertsConfig,
    /// Customer history lookup
    pub history: HistoryConfig,
    /// External explanation service
    pub explainer: ExplainerConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Path to the fitted ONNX binary classifier
    pub model_path: PathBuf,
    /// Path to the fitted scaler parameters (JSON); missing file means identity scaling
    pub scaler_path: PathBuf,
    /// Display name of the model version, carried into logs
    pub model_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Amount above which the is_high_value flag is set
    pub high_value_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Account age (days) below which an account counts as new
    pub new_account_days: u32,
    /// Amount above which a new-account transaction is high risk
    pub high_risk_amount: f64,
    /// Amount above which a missing KYC verification is critical
    pub unverified_critical_amount: f64,
    /// Multiplier over the customer average that triggers the average-amount rule
    pub high_amount_multiplier: f64,
    /// Suspicious-hour window, inclusive on both ends
    pub suspicious_hour_start: u32,
    pub suspicious_hour_end: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Model probability at or above which the label is Fraud (0.0–1.0)
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// SQLite database for fraud alerts; None keeps alerts in memory
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// SQLite database holding past transactions; None disables the average-amount rule
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Whether the external explanation service is called at all
    pub enabled: bool,
    /// Endpoint URL when enabled
    pub endpoint: Option<String>,
    /// Hard timeout for the single explanation attempt
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig::default(),
            features: FeaturesConfig::default(),
            rules: RulesConfig::default(),
            fusion: FusionConfig::default(),
            alerts: AlertsConfig::default(),
            history: HistoryConfig::default(),
            explainer: ExplainerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/classifier.onnx"),
            scaler_path: PathBuf::from("models/scaler.json"),
            model_name: "unknown".to_string(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: 50_000.0,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            new_account_days: 7,
            high_risk_amount: 20_000.0,
            unverified_critical_amount: 50_000.0,
            high_amount_multiplier: 5.0,
            suspicious_hour_start: 2,
            suspicious_hour_end: 4,
        }
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            db_path: Some(PathBuf::from("data/alerts.db")),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { db_path: None }
    }
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_ms: 1_000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
