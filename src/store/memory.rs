//! In-memory alert store: storeless deployments and tests. An atomic
//! counter keeps id assignment unique and monotonic across threads.

use super::{Alert, AlertFilter, AlertStatus, AlertStore, NewAlert, DEFAULT_LIST_LIMIT};
use crate::error::EngineError;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct MemoryAlertStore {
    next_id: AtomicI64,
    alerts: Mutex<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            alerts: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertStore for MemoryAlertStore {
    fn create(&self, alert: NewAlert) -> Result<i64, EngineError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut alerts = self.alerts.lock().unwrap();
        alerts.push(Alert {
            alert_id: id,
            transaction_id: alert.transaction_id,
            customer_id: alert.customer_id,
            severity: alert.severity,
            status: AlertStatus::New,
            risk_score: alert.risk_score,
            triggered_rules: alert.triggered_rules,
            message: alert.message,
            created_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
            resolution_notes: None,
        });
        Ok(id)
    }

    fn list(&self, filter: &AlertFilter) -> Result<Vec<Alert>, EngineError> {
        let alerts = self.alerts.lock().unwrap();
        let mut out: Vec<Alert> = alerts
            .iter()
            .filter(|a| filter.severity.map_or(true, |s| a.severity == s))
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .filter(|a| {
                filter
                    .customer_id
                    .as_deref()
                    .map_or(true, |c| a.customer_id == c)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.alert_id.cmp(&a.alert_id));
        out.truncate(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT));
        Ok(out)
    }

    fn update_status(
        &self,
        alert_id: i64,
        status: AlertStatus,
        resolved_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), EngineError> {
        let mut alerts = self.alerts.lock().unwrap();
        let alert = alerts
            .iter_mut()
            .find(|a| a.alert_id == alert_id)
            .ok_or_else(|| EngineError::StorageUnavailable(format!("alert {alert_id} not found")))?;
        alert.status = status;
        if status.is_terminal() {
            alert.resolved_at = Some(Utc::now());
            alert.resolved_by = resolved_by.map(String::from);
            alert.resolution_notes = notes.map(String::from);
        }
        Ok(())
    }
}
