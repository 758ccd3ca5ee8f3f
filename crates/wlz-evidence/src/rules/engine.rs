use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::{
    CheckCategory, CheckContext, CheckResult, CheckRule, CheckStatus, FrameworkSelector,
    RuleError, RuleOutcome, RuleRegistry, Severity,
};

/// Stateless evaluator that runs a framework's rule set against a context.
///
/// Every rule yields exactly one result. A predicate that returns an error, panics, or is
/// missing from the registry becomes a `fail` with `medium` severity in the
/// `consistency` category; evaluation of the remaining rules continues.
#[derive(Debug, Clone)]
pub struct NormativeRuleEngine {
    registry: Arc<RuleRegistry>,
}

impl NormativeRuleEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(RuleRegistry::builtin()))
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn execute_normative_checks(
        &self,
        context: &CheckContext,
        framework: &FrameworkSelector,
    ) -> Vec<CheckResult> {
        let rules = match &framework.rules {
            Some(rules) => rules.clone(),
            None => self
                .registry
                .rule_set(framework.framework_type, &framework.version),
        };

        if rules.is_empty() {
            warn!(
                framework_type = ?framework.framework_type,
                version = %framework.version,
                "no rules registered for framework version"
            );
        }

        let results: Vec<CheckResult> = rules
            .iter()
            .map(|rule| self.run_rule(rule, context))
            .collect();

        debug!(
            client_id = %context.client_id,
            rules = results.len(),
            failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count(),
            "normative checks evaluated"
        );
        results
    }

    fn run_rule(&self, rule: &CheckRule, context: &CheckContext) -> CheckResult {
        let outcome = match self.registry.predicate(&rule.id) {
            Some(predicate) => {
                match panic::catch_unwind(AssertUnwindSafe(|| predicate(context))) {
                    Ok(outcome) => outcome,
                    Err(payload) => Err(RuleError::Panicked(panic_message(payload.as_ref()))),
                }
            }
            None => Err(RuleError::Unregistered(rule.id.clone())),
        };

        match outcome {
            Ok(RuleOutcome { status, message }) => CheckResult {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                category: rule.category,
                status,
                message,
                severity: rule.severity,
                checked_at: Utc::now(),
            },
            Err(error) => {
                warn!(rule_id = %rule.id, %error, "rule evaluation failed");
                CheckResult {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    category: CheckCategory::Consistency,
                    status: CheckStatus::Fail,
                    message: format!("Fout bij evalueren van regel: {error}"),
                    severity: Severity::Medium,
                    checked_at: Utc::now(),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "onbekende fout".to_string()
    }
}
