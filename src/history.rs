//! Customer transaction-history lookup. Absence of history is a valid,
//! defined state: the average-amount rule simply does not trigger.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Per-customer aggregate over past non-fraud transactions.
#[derive(Debug, Clone, Copy)]
pub struct CustomerHistory {
    pub avg_amount: f64,
    pub transaction_count: u64,
}

/// Capability interface over whatever owns the transaction history.
pub trait HistoryProvider: Send + Sync {
    fn lookup(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerHistory>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Null provider: no history subsystem configured.
pub struct NoHistory;

impl HistoryProvider for NoHistory {
    fn lookup(
        &self,
        _customer_id: &str,
    ) -> Result<Option<CustomerHistory>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }
}

/// SQLite-backed provider over a `transactions` table. Only non-fraud rows
/// count toward the average.
pub struct SqliteHistoryProvider {
    conn: Mutex<Connection>,
}

impl SqliteHistoryProvider {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl HistoryProvider for SqliteHistoryProvider {
    fn lookup(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerHistory>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT AVG(transaction_amount), COUNT(*) FROM transactions \
             WHERE customer_id = ?1 AND is_fraud = 0",
        )?;
        let row: (Option<f64>, u64) =
            stmt.query_row([customer_id], |r| Ok((r.get(0)?, r.get(1)?)))?;
        match row {
            (Some(avg), count) if count > 0 => Ok(Some(CustomerHistory {
                avg_amount: avg,
                transaction_count: count,
            })),
            _ => Ok(None),
        }
    }
}
