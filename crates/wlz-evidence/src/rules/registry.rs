use std::collections::HashMap;

use super::builtin;
use super::{CheckContext, CheckRule, RuleError, RuleOutcome};
use crate::versions::FrameworkType;

/// Pure evaluation function resolved by rule id.
pub type RulePredicate = fn(&CheckContext) -> Result<RuleOutcome, RuleError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("rule id '{0}' is already registered")]
    DuplicateRule(String),
    #[error("rule set {framework_type:?} {version} references unknown rule '{rule_id}'")]
    UnknownRule {
        framework_type: FrameworkType,
        version: String,
        rule_id: String,
    },
}

/// Rule descriptors, their predicates, and the rule set of each framework version.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, CheckRule>,
    predicates: HashMap<String, RulePredicate>,
    rule_sets: HashMap<(FrameworkType, String), Vec<String>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Meerzorg and Herindicatie rule sets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (rule, predicate) in builtin::definitions() {
            registry.predicates.insert(rule.id.clone(), predicate);
            registry.rules.insert(rule.id.clone(), rule);
        }
        for (framework_type, version, rule_ids) in builtin::RULE_SETS {
            registry.rule_sets.insert(
                (*framework_type, version.to_string()),
                rule_ids.iter().map(|id| id.to_string()).collect(),
            );
        }
        registry
    }

    pub fn register(
        &mut self,
        rule: CheckRule,
        predicate: RulePredicate,
    ) -> Result<(), RegistryError> {
        if self.rules.contains_key(&rule.id) {
            return Err(RegistryError::DuplicateRule(rule.id));
        }
        self.predicates.insert(rule.id.clone(), predicate);
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    pub fn register_rule_set<I, S>(
        &mut self,
        framework_type: FrameworkType,
        version: &str,
        rule_ids: I,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule_ids: Vec<String> = rule_ids.into_iter().map(Into::into).collect();
        if let Some(unknown) = rule_ids.iter().find(|id| !self.rules.contains_key(*id)) {
            return Err(RegistryError::UnknownRule {
                framework_type,
                version: version.to_string(),
                rule_id: unknown.clone(),
            });
        }
        self.rule_sets
            .insert((framework_type, version.to_string()), rule_ids);
        Ok(())
    }

    pub fn rule(&self, id: &str) -> Option<&CheckRule> {
        self.rules.get(id)
    }

    pub fn predicate(&self, id: &str) -> Option<RulePredicate> {
        self.predicates.get(id).copied()
    }

    /// Descriptors of the rule set for `(framework_type, version)`; empty when unknown.
    pub fn rule_set(&self, framework_type: FrameworkType, version: &str) -> Vec<CheckRule> {
        self.rule_sets
            .get(&(framework_type, version.to_string()))
            .map(|ids| ids.iter().filter_map(|id| self.rules.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    pub fn has_rule_set(&self, framework_type: FrameworkType, version: &str) -> bool {
        self.rule_sets
            .contains_key(&(framework_type, version.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.len())
            .field("rule_sets", &self.rule_sets.len())
            .finish()
    }
}
