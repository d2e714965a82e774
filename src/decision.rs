//! Score fusion and severity classification.
//!
//! A triggered rule forces Fraud regardless of model confidence, and a model
//! score at or above the threshold forces Fraud regardless of rules. Both
//! directions are load-bearing.

use crate::rules::RuleOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Fraud,
    Legitimate,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fraud => "Fraud",
            Verdict::Legitimate => "Legitimate",
        }
    }
}

/// Ordered urgency band derived solely from the final risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Band boundaries are inclusive on the lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Severity::Critical
        } else if score >= 0.7 {
            Severity::High
        } else if score >= 0.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "LOW" => Some(Severity::Low),
            "MEDIUM" => Some(Severity::Medium),
            "HIGH" => Some(Severity::High),
            "CRITICAL" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Fused scoring outcome for one transaction. Request-scoped.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    pub ml_risk_score: f64,
    pub rule_risk_score: f64,
    pub final_risk_score: f64,
    pub final_label: Verdict,
    /// Triggered rules, highest priority first.
    pub triggered_rules: Vec<RuleOutcome>,
    pub threshold: f64,
}

/// Fuse the model probability and the rule score under a fixed policy:
/// final score is the max of the two, and the label is Fraud when any rule
/// triggered or the model score meets the threshold.
pub fn fuse(
    ml_score: f64,
    rule_score: f64,
    triggered_rules: Vec<RuleOutcome>,
    threshold: f64,
) -> ScoringResult {
    let ml_risk_score = ml_score.clamp(0.0, 1.0);
    let rule_risk_score = rule_score.clamp(0.0, 1.0);
    let final_label = if !triggered_rules.is_empty() || ml_risk_score >= threshold {
        Verdict::Fraud
    } else {
        Verdict::Legitimate
    };
    ScoringResult {
        ml_risk_score,
        rule_risk_score,
        final_risk_score: ml_risk_score.max(rule_risk_score),
        final_label,
        triggered_rules,
        threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(priority: u8, contribution: f64) -> RuleOutcome {
        RuleOutcome {
            rule_id: "r",
            description: "rule",
            priority,
            contribution,
        }
    }

    #[test]
    fn final_score_is_max_of_components() {
        let r = fuse(0.2, 0.85, vec![outcome(3, 0.85)], 0.3);
        assert_eq!(r.final_risk_score, 0.85);
        let r = fuse(0.9, 0.6, vec![outcome(2, 0.6)], 0.3);
        assert_eq!(r.final_risk_score, 0.9);
    }

    #[test]
    fn rule_alone_forces_fraud() {
        let r = fuse(0.01, 0.6, vec![outcome(2, 0.6)], 0.3);
        assert_eq!(r.final_label, Verdict::Fraud);
    }

    #[test]
    fn model_alone_forces_fraud() {
        let r = fuse(0.31, 0.0, Vec::new(), 0.3);
        assert_eq!(r.final_label, Verdict::Fraud);
        // Inclusive at the threshold.
        let r = fuse(0.3, 0.0, Vec::new(), 0.3);
        assert_eq!(r.final_label, Verdict::Fraud);
    }

    #[test]
    fn legitimate_below_threshold_without_rules() {
        let r = fuse(0.29, 0.0, Vec::new(), 0.3);
        assert_eq!(r.final_label, Verdict::Legitimate);
        assert_eq!(r.final_risk_score, 0.29);
    }

    #[test]
    fn severity_bands_exhaustive_and_monotonic() {
        assert_eq!(Severity::from_score(0.0), Severity::Low);
        assert_eq!(Severity::from_score(0.49), Severity::Low);
        assert_eq!(Severity::from_score(0.5), Severity::Medium);
        assert_eq!(Severity::from_score(0.69), Severity::Medium);
        assert_eq!(Severity::from_score(0.7), Severity::High);
        assert_eq!(Severity::from_score(0.89), Severity::High);
        assert_eq!(Severity::from_score(0.9), Severity::Critical);
        assert_eq!(Severity::from_score(1.0), Severity::Critical);

        let mut prev = Severity::Low;
        for i in 0..=100 {
            let s = Severity::from_score(i as f64 / 100.0);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn severity_roundtrips_strings() {
        for s in [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            assert_eq!(Severity::parse(s.as_str()), Some(s));
        }
        assert_eq!(Severity::parse("urgent"), None);
    }
}
