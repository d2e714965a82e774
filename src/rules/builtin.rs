//! Reference rule set. Contributions are calibrated against the fitted
//! classifier's probability scale so fusion can take a plain max.

use super::Rule;
use crate::config::RulesConfig;
use crate::history::CustomerHistory;
use crate::transaction::{Channel, Transaction};
use chrono::Timelike;

type RuleResult = Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>>;

/// P6: high amount without KYC verification. Two fixed tiers: 0.70 above
/// `unverified_critical_amount`, 0.55 above `high_risk_amount`.
pub struct HighAmountUnverifiedKyc {
    high_risk_amount: f64,
    critical_amount: f64,
}

impl HighAmountUnverifiedKyc {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            high_risk_amount: config.high_risk_amount,
            critical_amount: config.unverified_critical_amount,
        }
    }
}

impl Rule for HighAmountUnverifiedKyc {
    fn id(&self) -> &'static str {
        "high_amount_unverified_kyc"
    }
    fn description(&self) -> &'static str {
        "High transaction amount without KYC verification"
    }
    fn priority(&self) -> u8 {
        6
    }
    fn evaluate(&self, tx: &Transaction, _history: Option<&CustomerHistory>) -> RuleResult {
        if !tx.kyc_verified {
            if tx.transaction_amount > self.critical_amount {
                return Ok(Some(0.70));
            }
            if tx.transaction_amount > self.high_risk_amount {
                return Ok(Some(0.55));
            }
        }
        Ok(None)
    }
}

/// P5: account younger than `new_account_days` moving more than
/// `high_risk_amount`. Contribution grows with the amount, 0.75 at the
/// threshold up to a 0.95 cap.
pub struct NewAccountHighAmount {
    new_account_days: u32,
    high_risk_amount: f64,
}

impl NewAccountHighAmount {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            new_account_days: config.new_account_days,
            high_risk_amount: config.high_risk_amount,
        }
    }
}

impl Rule for NewAccountHighAmount {
    fn id(&self) -> &'static str {
        "new_account_high_amount"
    }
    fn description(&self) -> &'static str {
        "New account with high transaction amount"
    }
    fn priority(&self) -> u8 {
        5
    }
    fn evaluate(&self, tx: &Transaction, _history: Option<&CustomerHistory>) -> RuleResult {
        if tx.account_age_days < self.new_account_days
            && tx.transaction_amount > self.high_risk_amount
        {
            let amount_factor =
                ((tx.transaction_amount - self.high_risk_amount) / 100_000.0).min(0.20);
            return Ok(Some((0.75 + amount_factor).min(0.95)));
        }
        Ok(None)
    }
}

/// P4: amount more than `high_amount_multiplier` times the customer's
/// historical average. Does not trigger when no history is available; the
/// pipeline treats absent history as a defined state, not an error.
pub struct AmountVsAverage {
    multiplier: f64,
}

impl AmountVsAverage {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            multiplier: config.high_amount_multiplier,
        }
    }
}

impl Rule for AmountVsAverage {
    fn id(&self) -> &'static str {
        "high_amount_vs_average"
    }
    fn description(&self) -> &'static str {
        "High amount compared to customer average"
    }
    fn priority(&self) -> u8 {
        4
    }
    fn evaluate(&self, tx: &Transaction, history: Option<&CustomerHistory>) -> RuleResult {
        let Some(history) = history else {
            return Ok(None);
        };
        if history.avg_amount <= 0.0 {
            return Ok(None);
        }
        let ratio = tx.transaction_amount / history.avg_amount;
        if ratio > self.multiplier {
            let contribution = (0.70 + (ratio - self.multiplier) * 0.05).min(0.95);
            return Ok(Some(contribution));
        }
        Ok(None)
    }
}

/// P3: international channel without KYC verification. Fixed 0.85.
pub struct InternationalUnverified;

impl Rule for InternationalUnverified {
    fn id(&self) -> &'static str {
        "international_unverified"
    }
    fn description(&self) -> &'static str {
        "International transaction without KYC verification"
    }
    fn priority(&self) -> u8 {
        3
    }
    fn evaluate(&self, tx: &Transaction, _history: Option<&CustomerHistory>) -> RuleResult {
        if tx.channel == Channel::International && !tx.kyc_verified {
            return Ok(Some(0.85));
        }
        Ok(None)
    }
}

/// P2: local transaction hour inside the suspicious window (02–04
/// inclusive by default). Fixed 0.60.
pub struct OddHour {
    start: u32,
    end: u32,
}

impl OddHour {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            start: config.suspicious_hour_start,
            end: config.suspicious_hour_end,
        }
    }
}

impl Rule for OddHour {
    fn id(&self) -> &'static str {
        "odd_hour_transaction"
    }
    fn description(&self) -> &'static str {
        "Transaction during suspicious hours (2-4 AM)"
    }
    fn priority(&self) -> u8 {
        2
    }
    fn evaluate(&self, tx: &Transaction, _history: Option<&CustomerHistory>) -> RuleResult {
        let hour = tx.timestamp.hour();
        if hour >= self.start && hour <= self.end {
            return Ok(Some(0.60));
        }
        Ok(None)
    }
}
