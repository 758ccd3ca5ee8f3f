//! Normative rule engine: rule descriptors, predicate registry, evaluation, and summary.

pub mod builtin;
mod engine;
mod registry;
mod summary;

#[cfg(test)]
mod tests;

pub use engine::NormativeRuleEngine;
pub use registry::{RegistryError, RuleRegistry, RulePredicate};
pub use summary::{summarize, CheckSummary, SeverityCounts};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dossier::Dossier;
use crate::form::{FieldValueError, FormData};
use crate::versions::{FrameworkType, VersionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    RequiredField,
    /// Policy rule from the assessment framework ("toetsingskader").
    ToetsingskaderRule,
    Completeness,
    Consistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

/// Serializable rule descriptor. The behaviour lives in the [`RuleRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRule {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

impl CheckRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: CheckCategory,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            severity,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What a predicate decided; the engine adds the rule metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub status: CheckStatus,
    pub message: String,
}

impl RuleOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
        }
    }
}

/// Failure raised by a predicate; converted into a `fail` result by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    InvalidField(#[from] FieldValueError),
    #[error("geen evaluatiefunctie geregistreerd voor regel '{0}'")]
    Unregistered(String),
    #[error("regel afgebroken: {0}")]
    Panicked(String),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// One evaluated rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub rule_id: String,
    pub rule_name: String,
    pub category: CheckCategory,
    pub status: CheckStatus,
    pub message: String,
    pub severity: Severity,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn is_blocking(&self) -> bool {
        self.status == CheckStatus::Fail && self.severity == Severity::Critical
    }
}

/// Shared, read-only input for every predicate in one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckContext {
    pub client_id: String,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default)]
    pub dossier: Dossier,
    pub config: VersionConfig,
}

impl CheckContext {
    pub fn new(client_id: impl Into<String>, as_of: NaiveDate, config: VersionConfig) -> Self {
        Self {
            client_id: client_id.into(),
            as_of,
            form_data: FormData::new(),
            dossier: Dossier::default(),
            config,
        }
    }

    pub fn with_form_data(mut self, form_data: FormData) -> Self {
        self.form_data = form_data;
        self
    }

    pub fn with_dossier(mut self, dossier: Dossier) -> Self {
        self.dossier = dossier;
        self
    }
}

/// Which rule set to run. Explicit `rules` override the registry lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkSelector {
    pub framework_type: FrameworkType,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<CheckRule>>,
}

impl FrameworkSelector {
    pub fn new(framework_type: FrameworkType, version: impl Into<String>) -> Self {
        Self {
            framework_type,
            version: version.into(),
            rules: None,
        }
    }

    pub fn with_rules(mut self, rules: Vec<CheckRule>) -> Self {
        self.rules = Some(rules);
        self
    }
}
