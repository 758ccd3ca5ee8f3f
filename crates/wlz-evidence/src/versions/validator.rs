use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{VersionConfig, FEATURE_SUSTAINABILITY_REQUIRED};
use crate::evidence::confidence::age_in_days;
use crate::form::{self, FormData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl ValidationIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no issue has `error` severity.
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
    }
}

pub(super) fn validate(
    form_data: &FormData,
    config: &VersionConfig,
    as_of: NaiveDate,
) -> ValidationReport {
    let mut issues = Vec::new();

    for field in form::HOUR_FIELDS {
        let Some(limit) = config.limits.hour_limit(field) else {
            continue;
        };
        match form::hours(form_data, field) {
            Ok(Some(hours)) if hours > limit => issues.push(ValidationIssue::error(
                field,
                format!(
                    "{hours} uur overschrijdt het maximum van {limit} uur voor {} {}",
                    config.framework_type, config.version
                ),
            )),
            Ok(_) => {}
            Err(error) => issues.push(ValidationIssue::warning(field, error.to_string())),
        }
    }

    if config.feature(FEATURE_SUSTAINABILITY_REQUIRED)
        && !form::is_filled(form_data, form::SUSTAINABILITY_ARGUMENT)
    {
        issues.push(ValidationIssue::error(
            form::SUSTAINABILITY_ARGUMENT,
            format!(
                "Onderbouwing van duurzaamheid is verplicht vanaf {} {}",
                config.framework_type, config.version
            ),
        ));
    }

    if let Some(issue) = assessment_recency(form_data, config, as_of) {
        issues.push(issue);
    }

    ValidationReport {
        valid: !issues
            .iter()
            .any(|issue| issue.severity == IssueSeverity::Error),
        issues,
    }
}

/// Warning when the last assessment falls outside the version's recency window.
pub(super) fn assessment_recency(
    form_data: &FormData,
    config: &VersionConfig,
    as_of: NaiveDate,
) -> Option<ValidationIssue> {
    let window = config.limits.min_assessment_recency_days;
    match form::date(form_data, form::ASSESSMENT_DATE) {
        Ok(Some(assessed)) if age_in_days(assessed, as_of) > window => {
            Some(ValidationIssue::warning(
                form::ASSESSMENT_DATE,
                format!(
                    "Laatste indicatie ({assessed}) is ouder dan {window} dagen"
                ),
            ))
        }
        Ok(_) => None,
        Err(error) => Some(ValidationIssue::warning(form::ASSESSMENT_DATE, error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::versions::{FrameworkType, VersionManager};

    fn form(value: Value) -> FormData {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date")
    }

    #[test]
    fn unparsable_hours_are_warnings() {
        let report = VersionManager::default().validate_against_version(
            &form(json!({ "nachtzorg_uren": "hele nacht" })),
            FrameworkType::Herindicatie,
            "2025",
            as_of(),
        );

        assert!(report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "nachtzorg_uren");
        assert_eq!(report.issues[0].severity, IssueSeverity::Warning);
    }

    #[test]
    fn missing_sustainability_is_an_error_only_when_required() {
        let manager = VersionManager::default();
        let data = form(json!({ "dagzorg_uren": 4 }));

        let report =
            manager.validate_against_version(&data, FrameworkType::Meerzorg, "2026", as_of());
        assert!(!report.valid);
        assert_eq!(
            report.errors().map(|issue| issue.field.as_str()).collect::<Vec<_>>(),
            vec!["duurzaamheid_onderbouwing"]
        );

        let report =
            manager.validate_against_version(&data, FrameworkType::Meerzorg, "2025", as_of());
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn stale_assessment_is_a_warning() {
        let data = form(json!({ "laatste_indicatiedatum": "2025-06-01" }));
        let manager = VersionManager::default();

        let report =
            manager.validate_against_version(&data, FrameworkType::Herindicatie, "2026", as_of());
        assert!(report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, IssueSeverity::Warning);

        // 2025 allows a full year.
        let report =
            manager.validate_against_version(&data, FrameworkType::Herindicatie, "2025", as_of());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn unknown_version_validates_against_conservative_limits() {
        let data = form(json!({ "dagzorg_uren": 13 }));
        let report = VersionManager::default().validate_against_version(
            &data,
            FrameworkType::Meerzorg,
            "2031",
            as_of(),
        );
        assert!(!report.valid);
        assert_eq!(report.issues[0].field, "dagzorg_uren");
    }
}
