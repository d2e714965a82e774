//! SQLite-backed alert store. AUTOINCREMENT gives unique, monotonic ids;
//! the single connection behind a mutex serializes writers.

use super::{Alert, AlertFilter, AlertStatus, AlertStore, NewAlert, DEFAULT_LIST_LIMIT};
use crate::decision::Severity;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::Mutex;

pub struct SqliteAlertStore {
    conn: Mutex<Connection>,
}

impl SqliteAlertStore {
    /// Open or create the alert database at `path`.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let conn =
            Connection::open(path).map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS fraud_alerts (
                alert_id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_id TEXT NOT NULL,
                customer_id TEXT NOT NULL,
                severity TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'NEW',
                risk_score REAL NOT NULL,
                triggered_rules TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL,
                resolved_at TEXT,
                resolved_by TEXT,
                resolution_notes TEXT,

                CHECK (severity IN ('LOW', 'MEDIUM', 'HIGH', 'CRITICAL')),
                CHECK (status IN ('NEW', 'INVESTIGATING', 'RESOLVED', 'FALSE_POSITIVE', 'CONFIRMED'))
            );
            CREATE INDEX IF NOT EXISTS idx_alerts_customer ON fraud_alerts(customer_id);
            CREATE INDEX IF NOT EXISTS idx_alerts_status ON fraud_alerts(status);
            CREATE INDEX IF NOT EXISTS idx_alerts_severity ON fraud_alerts(severity);
            "#,
        )
        .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<Alert> {
        let severity: String = row.get("severity")?;
        let status: String = row.get("status")?;
        let created_at: String = row.get("created_at")?;
        let resolved_at: Option<String> = row.get("resolved_at")?;
        Ok(Alert {
            alert_id: row.get("alert_id")?,
            transaction_id: row.get("transaction_id")?,
            customer_id: row.get("customer_id")?,
            severity: Severity::parse(&severity).unwrap_or(Severity::Low),
            status: AlertStatus::parse(&status).unwrap_or(AlertStatus::New),
            risk_score: row.get("risk_score")?,
            triggered_rules: row.get("triggered_rules")?,
            message: row.get("message")?,
            created_at: parse_ts(&created_at),
            resolved_at: resolved_at.as_deref().map(parse_ts),
            resolved_by: row.get("resolved_by")?,
            resolution_notes: row.get("resolution_notes")?,
        })
    }
}

fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl AlertStore for SqliteAlertStore {
    fn create(&self, alert: NewAlert) -> Result<i64, EngineError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO fraud_alerts \
             (transaction_id, customer_id, severity, status, risk_score, triggered_rules, message, created_at) \
             VALUES (?1, ?2, ?3, 'NEW', ?4, ?5, ?6, ?7)",
            params![
                alert.transaction_id,
                alert.customer_id,
                alert.severity.as_str(),
                alert.risk_score,
                alert.triggered_rules,
                alert.message,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn list(&self, filter: &AlertFilter) -> Result<Vec<Alert>, EngineError> {
        let mut sql = String::from("SELECT * FROM fraud_alerts WHERE 1=1");
        let mut args: Vec<String> = Vec::new();
        if let Some(severity) = filter.severity {
            sql.push_str(" AND severity = ?");
            args.push(severity.as_str().to_string());
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            args.push(status.as_str().to_string());
        }
        if let Some(ref customer_id) = filter.customer_id {
            sql.push_str(" AND customer_id = ?");
            args.push(customer_id.clone());
        }
        // alert_id is monotonic, so id order is creation order.
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        sql.push_str(&format!(" ORDER BY alert_id DESC LIMIT {limit}"));

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_alert)
            .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::StorageUnavailable(e.to_string()))
    }

    fn update_status(
        &self,
        alert_id: i64,
        status: AlertStatus,
        resolved_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), EngineError> {
        let conn = self.conn.lock().unwrap();
        let changed = if status.is_terminal() {
            conn.execute(
                "UPDATE fraud_alerts SET status = ?1, resolved_at = ?2, resolved_by = ?3, resolution_notes = ?4 \
                 WHERE alert_id = ?5",
                params![
                    status.as_str(),
                    Utc::now().to_rfc3339(),
                    resolved_by,
                    notes,
                    alert_id
                ],
            )
        } else {
            conn.execute(
                "UPDATE fraud_alerts SET status = ?1 WHERE alert_id = ?2",
                params![status.as_str(), alert_id],
            )
        }
        .map_err(|e| EngineError::StorageUnavailable(e.to_string()))?;
        if changed == 0 {
            return Err(EngineError::StorageUnavailable(format!(
                "alert {alert_id} not found"
            )));
        }
        Ok(())
    }
}
