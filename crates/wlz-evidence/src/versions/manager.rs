use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::catalog::{FrameworkVersionStore, VersionCatalog};
use super::migration::{self, MigrationResult};
use super::validator::{self, ValidationReport};
use super::{FrameworkType, FrameworkVersion, VersionConfig};
use crate::form::FormData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitChange {
    pub limit: String,
    pub from: f64,
    pub to: f64,
}

/// What changes when a submission moves from one framework version to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDelta {
    pub framework_type: FrameworkType,
    pub from_version: String,
    pub to_version: String,
    pub limit_changes: Vec<LimitChange>,
    pub features_enabled: Vec<String>,
    pub features_disabled: Vec<String>,
    pub rules_added: Vec<String>,
    pub rules_removed: Vec<String>,
    pub newly_required_fields: Vec<String>,
}

impl VersionDelta {
    pub fn is_empty(&self) -> bool {
        self.limit_changes.is_empty()
            && self.features_enabled.is_empty()
            && self.features_disabled.is_empty()
            && self.rules_added.is_empty()
            && self.rules_removed.is_empty()
            && self.newly_required_fields.is_empty()
    }
}

/// Entry point for everything version-aware. Generic over the store so tests and
/// adapters can supply their own timelines.
#[derive(Debug, Clone)]
pub struct VersionManager<S = VersionCatalog> {
    store: S,
}

impl Default for VersionManager<VersionCatalog> {
    fn default() -> Self {
        Self::new(VersionCatalog::builtin())
    }
}

impl<S> VersionManager<S>
where
    S: FrameworkVersionStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Version in force on `date`. `None` means the framework is not configured for that
    /// date; callers decide what to do with it.
    pub fn active_version(
        &self,
        framework_type: FrameworkType,
        date: NaiveDate,
    ) -> Option<FrameworkVersion> {
        self.store
            .list_versions(framework_type)
            .into_iter()
            .find(|version| version.is_active_on(date))
    }

    pub fn resolve_version_config(
        &self,
        framework_type: FrameworkType,
        version: &str,
    ) -> VersionConfig {
        match self.store.get_version(framework_type, version) {
            Some(found) => VersionConfig::from_version(&found),
            None => {
                warn!(
                    framework_type = %framework_type,
                    version,
                    "unknown framework version, using conservative default limits"
                );
                VersionConfig::conservative_default(framework_type, version)
            }
        }
    }

    pub fn compare_versions(
        &self,
        framework_type: FrameworkType,
        from: &str,
        to: &str,
    ) -> VersionDelta {
        let before = self.resolve_version_config(framework_type, from);
        let after = self.resolve_version_config(framework_type, to);

        let limit_changes = [
            (
                "max_day_care_hours",
                before.limits.max_day_care_hours,
                after.limits.max_day_care_hours,
            ),
            (
                "max_night_care_hours",
                before.limits.max_night_care_hours,
                after.limits.max_night_care_hours,
            ),
            (
                "max_one_on_one_hours",
                before.limits.max_one_on_one_hours,
                after.limits.max_one_on_one_hours,
            ),
            (
                "min_assessment_recency_days",
                before.limits.min_assessment_recency_days as f64,
                after.limits.min_assessment_recency_days as f64,
            ),
        ]
        .into_iter()
        .filter(|(_, from, to)| from != to)
        .map(|(limit, from, to)| LimitChange {
            limit: limit.to_string(),
            from,
            to,
        })
        .collect();

        let toggled = |on: bool| -> Vec<String> {
            after
                .features
                .iter()
                .filter(|(flag, enabled)| **enabled == on && before.feature(flag) != on)
                .map(|(flag, _)| flag.clone())
                .collect()
        };

        VersionDelta {
            framework_type,
            from_version: from.to_string(),
            to_version: to.to_string(),
            limit_changes,
            features_enabled: toggled(true),
            features_disabled: toggled(false),
            rules_added: difference(&after.rules, &before.rules),
            rules_removed: difference(&before.rules, &after.rules),
            newly_required_fields: difference(&after.required_fields, &before.required_fields),
        }
    }

    pub fn validate_against_version(
        &self,
        form_data: &FormData,
        framework_type: FrameworkType,
        version: &str,
        as_of: NaiveDate,
    ) -> ValidationReport {
        let config = self.resolve_version_config(framework_type, version);
        validator::validate(form_data, &config, as_of)
    }

    pub fn migrate(
        &self,
        form_data: &Value,
        from: &str,
        to: &str,
        framework_type: FrameworkType,
        as_of: NaiveDate,
    ) -> MigrationResult {
        let source = self.resolve_version_config(framework_type, from);
        let target = self.resolve_version_config(framework_type, to);
        migration::migrate(form_data, &source, &target, as_of)
    }
}

fn difference(left: &[String], right: &[String]) -> Vec<String> {
    left.iter()
        .filter(|item| !right.contains(item))
        .cloned()
        .collect()
}
