//! Fraudgate — hybrid real-time fraud scoring engine.
//!
//! Modular structure:
//! - [`transaction`] — Transaction input model, validation, channel normalization
//! - [`features`] — Deterministic feature transformation with fitted scaling
//! - [`model`] — ONNX binary-classifier inference
//! - [`rules`] — Priority-ordered business rule evaluation
//! - [`decision`] — Score fusion and severity classification
//! - [`store`] — Fraud alert persistence
//! - [`history`] — Customer transaction-history lookup
//! - [`explain`] — Plain-language explanation of verdicts
//! - [`pipeline`] — Request orchestration
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod decision;
pub mod error;
pub mod explain;
pub mod features;
pub mod history;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod store;
pub mod transaction;

pub use config::EngineConfig;
pub use decision::{Severity, ScoringResult, Verdict};
pub use error::EngineError;
pub use explain::{Explainer, HttpExplainer, TemplateExplainer};
pub use features::{FeatureTransformer, FeatureVector, FittedScaler};
pub use history::{CustomerHistory, HistoryProvider};
pub use logging::StructuredLogger;
pub use model::{OnnxClassifier, RiskModel};
pub use pipeline::{ScoreRequest, ScoreResponse, ScoringPipeline};
pub use rules::{Rule, RuleEngine, RuleOutcome};
pub use store::{Alert, AlertFilter, AlertStatus, AlertStore};
pub use transaction::{Channel, Transaction};
