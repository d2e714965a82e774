//! Transaction input model: validation, channel normalization, defaults.
//! A `Transaction` is immutable once accepted and owned by its request.

use crate::error::EngineError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Transaction channel. Unrecognized values normalize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Web,
    Mobile,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "ATM")]
    Atm,
    International,
    Other,
}

impl Channel {
    /// Normalize free-form channel strings ("Online", "app", "overseas", ...)
    /// to the canonical set.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "web" | "online" | "internet" => Channel::Web,
            "mobile" | "app" | "smartphone" => Channel::Mobile,
            "pos" | "terminal" => Channel::Pos,
            "atm" | "cash" => Channel::Atm,
            "international" | "foreign" | "overseas" => Channel::International,
            _ => Channel::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Web => "Web",
            Channel::Mobile => "Mobile",
            Channel::Pos => "POS",
            Channel::Atm => "ATM",
            Channel::International => "International",
            Channel::Other => "Other",
        }
    }
}

/// A single validated transaction, ready for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub customer_id: String,
    pub transaction_amount: f64,
    pub channel: Channel,
    pub account_age_days: u32,
    pub kyc_verified: bool,
    /// Timestamp with its original offset; rule evaluation uses the local hour.
    pub timestamp: DateTime<FixedOffset>,
}

impl Transaction {
    /// Validate raw request fields into a `Transaction`.
    ///
    /// Rejects with `InvalidInput` before any scoring when customer_id is
    /// missing/empty or the amount is absent, non-finite, or <= 0.
    pub fn from_request(req: &crate::pipeline::ScoreRequest) -> Result<Self, EngineError> {
        let customer_id = req
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EngineError::InvalidInput("customer_id is required".into()))?
            .to_string();

        let amount = req
            .transaction_amount
            .ok_or_else(|| EngineError::InvalidInput("transaction_amount is required".into()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::InvalidInput(
                "transaction_amount must be a positive number".into(),
            ));
        }

        // Timestamp is optional; an unparseable value degrades to receipt
        // time rather than rejecting the request.
        let timestamp = match req.timestamp.as_deref() {
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(timestamp = raw, error = %e, "unparseable timestamp; using receipt time");
                    Utc::now().fixed_offset()
                }
            },
            None => Utc::now().fixed_offset(),
        };

        Ok(Self {
            transaction_id: req
                .transaction_id
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            customer_id,
            transaction_amount: amount,
            channel: req
                .channel
                .as_deref()
                .map(Channel::parse)
                .unwrap_or(Channel::Other),
            account_age_days: req.account_age_days.unwrap_or(0),
            kyc_verified: req.kyc_verified.map(|v| v != 0).unwrap_or(false),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ScoreRequest;

    fn request(customer: Option<&str>, amount: Option<f64>) -> ScoreRequest {
        ScoreRequest {
            customer_id: customer.map(String::from),
            transaction_amount: amount,
            ..ScoreRequest::default()
        }
    }

    #[test]
    fn channel_aliases_normalize() {
        assert_eq!(Channel::parse("Online"), Channel::Web);
        assert_eq!(Channel::parse("APP"), Channel::Mobile);
        assert_eq!(Channel::parse("terminal"), Channel::Pos);
        assert_eq!(Channel::parse("cash"), Channel::Atm);
        assert_eq!(Channel::parse("overseas"), Channel::International);
        assert_eq!(Channel::parse("carrier-pigeon"), Channel::Other);
    }

    #[test]
    fn missing_amount_rejected() {
        let err = Transaction::from_request(&request(Some("C1"), None)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_amount_rejected() {
        for bad in [0.0, -10.0, f64::NAN] {
            let err = Transaction::from_request(&request(Some("C1"), Some(bad))).unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput(_)));
        }
    }

    #[test]
    fn blank_customer_rejected() {
        let err = Transaction::from_request(&request(Some("  "), Some(100.0))).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn malformed_timestamp_defaults_to_receipt_time() {
        let mut req = request(Some("C1"), Some(100.0));
        req.timestamp = Some("last tuesday".into());
        let before = Utc::now().fixed_offset();
        let tx = Transaction::from_request(&req).unwrap();
        assert!(tx.timestamp >= before);
    }

    #[test]
    fn transaction_id_generated_when_absent() {
        let tx = Transaction::from_request(&request(Some("C1"), Some(100.0))).unwrap();
        assert!(!tx.transaction_id.is_empty());
        assert_eq!(tx.channel, Channel::Other);
        assert!(!tx.kyc_verified);
        assert_eq!(tx.account_age_days, 0);
    }
}
