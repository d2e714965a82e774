//! Error taxonomy. Only `InvalidInput` and `ModelUnavailable` surface to callers;
//! the rest are absorbed by the pipeline with degraded behavior.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing required transaction fields. Rejected before scoring.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Classifier artifact failed to load or run. Fatal at startup, never retried per request.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A single rule failed to evaluate. Caught per-rule; the rule counts as not triggered.
    #[error("rule '{rule}' evaluation failed: {source}")]
    RuleEvaluation {
        rule: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Alert persistence failed. The scoring response is still returned without an alert id.
    #[error("alert storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Explanation service failed or timed out. A template explanation is substituted.
    #[error("explanation unavailable: {0}")]
    ExplanationUnavailable(String),
}
