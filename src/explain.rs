//! Plain-language explanation of a scoring verdict.
//!
//! The pipeline always calls through the [`Explainer`] capability with a
//! bounded timeout and exactly one attempt; on any failure it substitutes
//! the deterministic template text. Explanation failure never reaches the
//! caller as an error.

use crate::config::ExplainerConfig;
use crate::decision::{ScoringResult, Verdict};
use crate::error::EngineError;
use crate::transaction::Transaction;
use serde::Serialize;
use std::time::Duration;

/// Full scoring context handed to the explanation service.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationContext<'a> {
    pub transaction: &'a Transaction,
    pub result: &'a ScoringResult,
}

pub trait Explainer: Send + Sync {
    /// 2-3 sentences of plain language for the given verdict.
    fn explain(&self, ctx: &ExplanationContext<'_>) -> Result<String, EngineError>;
}

/// Network-backed explainer posting the scoring context to an external
/// text-generation service.
pub struct HttpExplainer {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpExplainer {
    pub fn new(config: &ExplainerConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_ref()?.trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .ok()?;
        Some(Self { client, endpoint })
    }
}

#[derive(serde::Deserialize)]
struct ExplainResponse {
    explanation: String,
}

impl Explainer for HttpExplainer {
    fn explain(&self, ctx: &ExplanationContext<'_>) -> Result<String, EngineError> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(ctx)
            .send()
            .map_err(|e| EngineError::ExplanationUnavailable(e.to_string()))?;
        if !res.status().is_success() {
            return Err(EngineError::ExplanationUnavailable(format!(
                "service returned {}",
                res.status()
            )));
        }
        let body: ExplainResponse = res
            .json()
            .map_err(|e| EngineError::ExplanationUnavailable(e.to_string()))?;
        let text = body.explanation.trim().to_string();
        if text.len() < 20 {
            return Err(EngineError::ExplanationUnavailable(
                "service returned an implausibly short explanation".into(),
            ));
        }
        Ok(text)
    }
}

/// Deterministic template explainer; also the fallback for [`HttpExplainer`].
pub struct TemplateExplainer;

impl TemplateExplainer {
    fn rule_phrase(description: &str) -> Option<&'static str> {
        let d = description.to_ascii_lowercase();
        if d.contains("average") {
            Some("the transaction amount is significantly higher than your usual spending pattern")
        } else if d.contains("new account") {
            Some("this is a high-value transaction from a recently opened account")
        } else if d.contains("international") || d.contains("kyc") {
            Some("international transactions require KYC verification for security")
        } else if d.contains("suspicious hours") || d.contains("odd hour") {
            Some("the transaction occurred during unusual hours (late night/early morning)")
        } else {
            None
        }
    }
}

impl Explainer for TemplateExplainer {
    fn explain(&self, ctx: &ExplanationContext<'_>) -> Result<String, EngineError> {
        let result = ctx.result;
        if result.final_label == Verdict::Legitimate {
            return Ok("This transaction appears to be legitimate based on normal customer \
                       behavior patterns and transaction characteristics."
                .to_string());
        }

        let reasons: Vec<&str> = result
            .triggered_rules
            .iter()
            .filter_map(|o| Self::rule_phrase(o.description))
            .collect();

        if !reasons.is_empty() {
            let joined = match reasons.len() {
                1 => reasons[0].to_string(),
                2 => format!("{} and {}", reasons[0], reasons[1]),
                _ => format!(
                    "{}, and {}",
                    reasons[..reasons.len() - 1].join(", "),
                    reasons[reasons.len() - 1]
                ),
            };
            let level = if result.final_risk_score >= 0.7 {
                "high"
            } else {
                "moderate"
            };
            return Ok(format!(
                "This transaction is flagged as {level} risk because {joined}. \
                 Please verify this transaction was authorized by you."
            ));
        }

        if result.final_risk_score >= 0.7 {
            Ok("This transaction is flagged as high risk due to unusual transaction \
                patterns. Please verify this transaction was authorized."
                .to_string())
        } else {
            Ok("This transaction shows some unusual characteristics and requires \
                verification for security purposes."
                .to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::fuse;
    use crate::rules::RuleOutcome;
    use crate::transaction::Channel;
    use chrono::DateTime;

    fn tx() -> Transaction {
        Transaction {
            transaction_id: "t1".into(),
            customer_id: "C1".into(),
            transaction_amount: 95_000.0,
            channel: Channel::Web,
            account_age_days: 5,
            kyc_verified: false,
            timestamp: DateTime::parse_from_rfc3339("2025-06-18T02:30:00+00:00").unwrap(),
        }
    }

    fn outcome(description: &'static str, priority: u8, c: f64) -> RuleOutcome {
        RuleOutcome {
            rule_id: "r",
            description,
            priority,
            contribution: c,
        }
    }

    #[test]
    fn legitimate_template() {
        let result = fuse(0.1, 0.0, Vec::new(), 0.3);
        let t = tx();
        let text = TemplateExplainer
            .explain(&ExplanationContext {
                transaction: &t,
                result: &result,
            })
            .unwrap();
        assert!(text.contains("legitimate"));
    }

    #[test]
    fn fraud_template_names_the_rules() {
        let result = fuse(
            0.2,
            0.95,
            vec![
                outcome("New account with high transaction amount", 5, 0.95),
                outcome("Transaction during suspicious hours (2-4 AM)", 2, 0.60),
            ],
            0.3,
        );
        let t = tx();
        let text = TemplateExplainer
            .explain(&ExplanationContext {
                transaction: &t,
                result: &result,
            })
            .unwrap();
        assert!(text.contains("high risk"));
        assert!(text.contains("recently opened account"));
        assert!(text.contains("unusual hours"));
    }

    #[test]
    fn fraud_without_rules_uses_generic_text() {
        let result = fuse(0.8, 0.0, Vec::new(), 0.3);
        let t = tx();
        let text = TemplateExplainer
            .explain(&ExplanationContext {
                transaction: &t,
                result: &result,
            })
            .unwrap();
        assert!(text.contains("unusual transaction patterns"));
    }

    #[test]
    fn template_is_deterministic() {
        let result = fuse(0.8, 0.0, Vec::new(), 0.3);
        let t = tx();
        let ctx = ExplanationContext {
            transaction: &t,
            result: &result,
        };
        assert_eq!(
            TemplateExplainer.explain(&ctx).unwrap(),
            TemplateExplainer.explain(&ctx).unwrap()
        );
    }
}
