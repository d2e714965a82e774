//! Priority-ordered business rule evaluation.
//!
//! Each rule is an independent predicate plus risk contribution; no rule may
//! observe another rule's outcome, so evaluation order never changes what
//! triggers. A rule that errors is logged and treated as not triggered.

mod builtin;

pub use builtin::{
    AmountVsAverage, HighAmountUnverifiedKyc, InternationalUnverified, NewAccountHighAmount,
    OddHour,
};

use crate::config::RulesConfig;
use crate::error::EngineError;
use crate::history::CustomerHistory;
use crate::transaction::Transaction;
use serde::Serialize;
use tracing::warn;

/// One rule's result for one transaction. Computed fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule_id: &'static str,
    pub description: &'static str,
    pub priority: u8,
    /// Risk contribution in [0, 1].
    pub contribution: f64,
}

/// A deterministic business predicate with an associated risk contribution.
///
/// `evaluate` returns `Ok(None)` when the rule does not trigger and
/// `Ok(Some(contribution))` when it does.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Higher = more significant; drives the ordering of triggered rules.
    fn priority(&self) -> u8;
    fn evaluate(
        &self,
        tx: &Transaction,
        history: Option<&CustomerHistory>,
    ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Engine with the reference rule set, highest priority first.
    pub fn with_default_rules(config: &RulesConfig) -> Self {
        Self::new(vec![
            Box::new(HighAmountUnverifiedKyc::new(config)),
            Box::new(NewAccountHighAmount::new(config)),
            Box::new(AmountVsAverage::new(config)),
            Box::new(InternationalUnverified),
            Box::new(OddHour::new(config)),
        ])
    }

    /// Engine over an arbitrary rule set; sorted by priority descending,
    /// declaration order on ties.
    pub fn new(mut rules: Vec<Box<dyn Rule>>) -> Self {
        rules.sort_by(|a, b| b.priority().cmp(&a.priority()));
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule. Returns the aggregate rule risk score (max over
    /// triggered contributions, 0 when none trigger) and the triggered
    /// outcomes ordered highest priority first.
    pub fn evaluate(
        &self,
        tx: &Transaction,
        history: Option<&CustomerHistory>,
    ) -> (f64, Vec<RuleOutcome>) {
        let mut triggered = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(tx, history) {
                Ok(Some(contribution)) => triggered.push(RuleOutcome {
                    rule_id: rule.id(),
                    description: rule.description(),
                    priority: rule.priority(),
                    contribution: contribution.clamp(0.0, 1.0),
                }),
                Ok(None) => {}
                Err(source) => {
                    // A failing rule must never abort the pipeline.
                    let err = EngineError::RuleEvaluation {
                        rule: rule.id(),
                        source,
                    };
                    warn!(rule = rule.id(), error = %err, "rule treated as not triggered");
                }
            }
        }
        let score = triggered
            .iter()
            .map(|o| o.contribution)
            .fold(0.0_f64, f64::max);
        (score, triggered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Channel;
    use chrono::DateTime;

    struct FailingRule;
    impl Rule for FailingRule {
        fn id(&self) -> &'static str {
            "failing"
        }
        fn description(&self) -> &'static str {
            "Always errors"
        }
        fn priority(&self) -> u8 {
            9
        }
        fn evaluate(
            &self,
            _tx: &Transaction,
            _history: Option<&CustomerHistory>,
        ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>> {
            Err("lookup exploded".into())
        }
    }

    fn tx(amount: f64, age: u32, channel: Channel, kyc: bool, ts: &str) -> Transaction {
        Transaction {
            transaction_id: "t1".into(),
            customer_id: "C1".into(),
            transaction_amount: amount,
            channel,
            account_age_days: age,
            kyc_verified: kyc,
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
        }
    }

    #[test]
    fn default_set_loads_all_builtin_rules() {
        let engine = RuleEngine::with_default_rules(&RulesConfig::default());
        assert_eq!(engine.rule_count(), 5);
    }

    #[test]
    fn no_rules_triggered_scores_zero() {
        let engine = RuleEngine::with_default_rules(&RulesConfig::default());
        let t = tx(250.0, 500, Channel::Pos, true, "2025-06-18T14:30:00+00:00");
        let (score, triggered) = engine.evaluate(&t, None);
        assert_eq!(score, 0.0);
        assert!(triggered.is_empty());
    }

    #[test]
    fn triggered_ordered_by_priority_desc() {
        let engine = RuleEngine::with_default_rules(&RulesConfig::default());
        // Unverified high amount (P6), new account + high amount (P5),
        // odd hour (P2).
        let t = tx(
            95_000.0,
            5,
            Channel::Web,
            false,
            "2025-06-18T02:30:00+00:00",
        );
        let (score, triggered) = engine.evaluate(&t, None);
        assert_eq!(score, 0.95);
        assert_eq!(triggered.len(), 3);
        assert!(triggered.windows(2).all(|w| w[0].priority > w[1].priority));
        assert_eq!(triggered[0].rule_id, "high_amount_unverified_kyc");
        assert_eq!(triggered[1].rule_id, "new_account_high_amount");
        assert_eq!(triggered[2].rule_id, "odd_hour_transaction");
    }

    #[test]
    fn failing_rule_is_skipped_not_fatal() {
        let engine = RuleEngine::new(vec![Box::new(FailingRule), Box::new(OddHour::new(&RulesConfig::default()))]);
        let t = tx(100.0, 500, Channel::Pos, true, "2025-06-18T03:00:00+00:00");
        let (score, triggered) = engine.evaluate(&t, None);
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].rule_id, "odd_hour_transaction");
        assert_eq!(score, 0.60);
    }

    #[test]
    fn contributions_stay_in_unit_interval() {
        let engine = RuleEngine::with_default_rules(&RulesConfig::default());
        let t = tx(
            10_000_000.0,
            0,
            Channel::International,
            false,
            "2025-06-18T03:00:00+00:00",
        );
        let history = CustomerHistory {
            avg_amount: 10.0,
            transaction_count: 50,
        };
        let (score, triggered) = engine.evaluate(&t, Some(&history));
        assert!(score <= 1.0);
        for o in &triggered {
            assert!((0.0..=1.0).contains(&o.contribution));
        }
    }
}
