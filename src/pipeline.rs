//! Scoring orchestrator: sequences validation, feature transformation, model
//! inference, rule evaluation, fusion, alert persistence, and explanation.
//!
//! Failure contract: only `InvalidInput` (and `ModelUnavailable`) abort a
//! request. Storage and explanation failures degrade — the scoring verdict
//! is never lost to a secondary subsystem.

use crate::config::EngineConfig;
use crate::decision::{fuse, Severity, Verdict};
use crate::error::EngineError;
use crate::explain::{ExplanationContext, Explainer, HttpExplainer, TemplateExplainer};
use crate::features::{FeatureTransformer, FittedScaler, FEATURE_DIM};
use crate::history::{HistoryProvider, NoHistory, SqliteHistoryProvider};
use crate::model::{OnnxClassifier, RiskModel};
use crate::rules::RuleEngine;
use crate::store::{AlertFilter, AlertStore, MemoryAlertStore, NewAlert, SqliteAlertStore};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Raw wire-shape request. Validation happens in
/// [`Transaction::from_request`]; nothing is scored before it passes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub customer_id: Option<String>,
    pub transaction_amount: Option<f64>,
    /// 0/1 on the wire
    pub kyc_verified: Option<u8>,
    pub account_age_days: Option<u32>,
    pub channel: Option<String>,
    /// RFC 3339; defaults to receipt time
    pub timestamp: Option<String>,
    pub transaction_id: Option<String>,
}

/// Complete scoring response. `alert_id` is present only when an alert was
/// created and persisted; `explanation` is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub success: bool,
    pub transaction_id: String,
    pub customer_id: String,
    pub final_label: Verdict,
    pub final_risk_score: f64,
    pub threshold: f64,
    pub ml_risk_score: f64,
    pub rule_risk_score: f64,
    pub triggered_rules: Vec<String>,
    pub severity: Severity,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<i64>,
}

pub struct ScoringPipeline {
    transformer: FeatureTransformer,
    model: Arc<dyn RiskModel>,
    rules: RuleEngine,
    store: Arc<dyn AlertStore>,
    history: Arc<dyn HistoryProvider>,
    /// External explanation service; the template fallback always backs it.
    explainer: Option<Arc<dyn Explainer>>,
    threshold: f64,
}

impl ScoringPipeline {
    /// Wire every dependency explicitly. All components are immutable after
    /// this point and shared by reference across concurrent requests.
    pub fn new(
        transformer: FeatureTransformer,
        model: Arc<dyn RiskModel>,
        rules: RuleEngine,
        store: Arc<dyn AlertStore>,
        history: Arc<dyn HistoryProvider>,
        explainer: Option<Arc<dyn Explainer>>,
        threshold: f64,
    ) -> Self {
        Self {
            transformer,
            model,
            rules,
            store,
            history,
            explainer,
            threshold,
        }
    }

    /// Build the full production pipeline from config. Classifier load
    /// failure is fatal here; nothing else is.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let scaler = FittedScaler::load(&config.artifacts.scaler_path);
        let transformer = FeatureTransformer::new(config.features.clone(), scaler);
        let model: Arc<dyn RiskModel> = Arc::new(OnnxClassifier::load(
            &config.artifacts.model_path,
            FEATURE_DIM,
        )?);
        let rules = RuleEngine::with_default_rules(&config.rules);
        info!(rules = rules.rule_count(), "rule engine initialized");

        let store: Arc<dyn AlertStore> = match &config.alerts.db_path {
            Some(path) => Arc::new(SqliteAlertStore::open(path)?),
            None => Arc::new(MemoryAlertStore::new()),
        };
        let history: Arc<dyn HistoryProvider> = match &config.history.db_path {
            Some(path) => Arc::new(
                SqliteHistoryProvider::open(path)
                    .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?,
            ),
            None => Arc::new(NoHistory),
        };
        let explainer: Option<Arc<dyn Explainer>> = if config.explainer.enabled {
            HttpExplainer::new(&config.explainer).map(|e| Arc::new(e) as Arc<dyn Explainer>)
        } else {
            None
        };

        Ok(Self::new(
            transformer,
            model,
            rules,
            store,
            history,
            explainer,
            config.fusion.threshold,
        ))
    }

    /// Score one transaction end to end.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreResponse, EngineError> {
        let tx = Transaction::from_request(request)?;

        let features = self.transformer.transform(&tx);
        let ml_score = self.model.score(&features)?;

        let history = match self.history.lookup(&tx.customer_id) {
            Ok(h) => h,
            Err(e) => {
                // Absent history is a defined state; a failed lookup degrades to it.
                warn!(customer_id = %tx.customer_id, error = %e, "history lookup failed");
                None
            }
        };
        let (rule_score, triggered) = self.rules.evaluate(&tx, history.as_ref());

        let result = fuse(ml_score, rule_score, triggered, self.threshold);
        let severity = Severity::from_score(result.final_risk_score);

        let alert_id = if result.final_label == Verdict::Fraud {
            self.persist_alert(&tx, &result, severity)
        } else {
            None
        };

        let explanation = self.explain(&tx, &result);

        info!(
            transaction_id = %tx.transaction_id,
            label = result.final_label.as_str(),
            score = result.final_risk_score,
            severity = severity.as_str(),
            rules = result.triggered_rules.len(),
            "transaction scored"
        );

        Ok(ScoreResponse {
            success: true,
            transaction_id: tx.transaction_id,
            customer_id: tx.customer_id,
            final_label: result.final_label,
            final_risk_score: result.final_risk_score,
            threshold: result.threshold,
            ml_risk_score: result.ml_risk_score,
            rule_risk_score: result.rule_risk_score,
            triggered_rules: result
                .triggered_rules
                .iter()
                .map(|o| o.description.to_string())
                .collect(),
            severity,
            explanation,
            alert_id,
        })
    }

    /// Read-only alert listing, most recent first.
    pub fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<crate::store::Alert>, EngineError> {
        self.store.list(filter)
    }

    /// Best-effort alert creation. On storage failure the response simply
    /// carries no alert id; an alert once created is never rolled back.
    fn persist_alert(
        &self,
        tx: &Transaction,
        result: &crate::decision::ScoringResult,
        severity: Severity,
    ) -> Option<i64> {
        let descriptions: Vec<&str> = result
            .triggered_rules
            .iter()
            .map(|o| o.description)
            .collect();
        let mut message = format!("ML model risk score: {:.1}%", result.ml_risk_score * 100.0);
        if !descriptions.is_empty() {
            message.push_str(&format!(
                "; Rules triggered ({}): {}",
                descriptions.len(),
                descriptions.join(", ")
            ));
        }
        let alert = NewAlert {
            transaction_id: tx.transaction_id.clone(),
            customer_id: tx.customer_id.clone(),
            severity,
            risk_score: result.final_risk_score,
            triggered_rules: serde_json::to_string(&descriptions).unwrap_or_else(|_| "[]".into()),
            message,
        };
        match self.store.create(alert) {
            Ok(id) => {
                info!(alert_id = id, transaction_id = %tx.transaction_id, severity = severity.as_str(), "fraud alert created");
                Some(id)
            }
            Err(e) => {
                warn!(transaction_id = %tx.transaction_id, error = %e, "alert persistence failed; response returned without alert id");
                None
            }
        }
    }

    /// One attempt against the external service, then the deterministic template.
    fn explain(&self, tx: &Transaction, result: &crate::decision::ScoringResult) -> String {
        let ctx = ExplanationContext {
            transaction: tx,
            result,
        };
        if let Some(explainer) = &self.explainer {
            match explainer.explain(&ctx) {
                Ok(text) => return text,
                Err(e) => {
                    warn!(transaction_id = %tx.transaction_id, error = %e, "explanation service failed; using template");
                }
            }
        }
        TemplateExplainer
            .explain(&ctx)
            .unwrap_or_else(|_| "Scoring completed.".to_string())
    }
}
