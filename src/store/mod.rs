//! Fraud alert persistence. One record per fraud-labeled transaction.
//!
//! Alerts are never deleted; case management only transitions their status.
//! Every implementation must hand out unique, monotonically increasing ids
//! even under concurrent creators.

mod memory;
mod sqlite;

pub use memory::MemoryAlertStore;
pub use sqlite::SqliteAlertStore;

use crate::decision::Severity;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    New,
    Investigating,
    Resolved,
    FalsePositive,
    Confirmed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "NEW",
            AlertStatus::Investigating => "INVESTIGATING",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::FalsePositive => "FALSE_POSITIVE",
            AlertStatus::Confirmed => "CONFIRMED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "NEW" => Some(AlertStatus::New),
            "INVESTIGATING" => Some(AlertStatus::Investigating),
            "RESOLVED" => Some(AlertStatus::Resolved),
            "FALSE_POSITIVE" => Some(AlertStatus::FalsePositive),
            "CONFIRMED" => Some(AlertStatus::Confirmed),
            _ => None,
        }
    }

    /// Terminal statuses stamp resolution metadata when set.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AlertStatus::Resolved | AlertStatus::FalsePositive | AlertStatus::Confirmed
        )
    }
}

/// A persisted fraud alert. Owned by the store for its entire lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: i64,
    pub transaction_id: String,
    pub customer_id: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub risk_score: f64,
    /// Triggered rule descriptions, serialized as a JSON array.
    pub triggered_rules: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution_notes: Option<String>,
}

/// Alert fields known before the store assigns an id. Status starts at NEW.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub transaction_id: String,
    pub customer_id: String,
    pub severity: Severity,
    pub risk_score: f64,
    pub triggered_rules: String,
    pub message: String,
}

/// Retrieval filter for the read-only listing interface.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
    pub customer_id: Option<String>,
    pub limit: Option<usize>,
}

pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Storage capability for fraud alerts. Id assignment is part of the
/// contract: unique and monotonically increasing under concurrent creates.
pub trait AlertStore: Send + Sync {
    /// Persist a new alert and return its assigned id.
    fn create(&self, alert: NewAlert) -> Result<i64, EngineError>;

    /// Alerts matching the filter, most recent first.
    fn list(&self, filter: &AlertFilter) -> Result<Vec<Alert>, EngineError>;

    /// Transition an alert's status. Terminal statuses stamp resolved_at
    /// plus the optional resolver and notes.
    fn update_status(
        &self,
        alert_id: i64,
        status: AlertStatus,
        resolved_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), EngineError>;
}
