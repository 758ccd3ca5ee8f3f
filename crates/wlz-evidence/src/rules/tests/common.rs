use chrono::NaiveDate;
use serde_json::json;

use crate::dossier::{Dossier, Incident, IncidentSeverity, Measure, Note};
use crate::form::FormData;
use crate::rules::{CheckContext, CheckRule, CheckStatus, RuleError, RuleOutcome, RuleRegistry};
use crate::rules::{CheckCategory, Severity};
use crate::versions::{FrameworkType, VersionCatalog, VersionConfig, VersionManager};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    as_of() - chrono::Duration::days(days)
}

pub(super) fn config(framework_type: FrameworkType, version: &str) -> VersionConfig {
    VersionManager::new(VersionCatalog::builtin()).resolve_version_config(framework_type, version)
}

pub(super) fn complete_form() -> FormData {
    let value = json!({
        "client_naam": "mevrouw A. de Vries",
        "bsn": "111222333",
        "zorgprofiel": "VV7",
        "aanvraag_toelichting": "Toegenomen onrust en nachtelijk dwalen.",
        "reden_herindicatie": "Zorgzwaarte is toegenomen.",
        "dagzorg_uren": 10,
        "nachtzorg_uren": "6",
        "een_op_een_uren": 2,
        "duurzaamheid_onderbouwing": "Progressieve dementie, geen herstel verwacht.",
        "laatste_indicatiedatum": "2025-12-01"
    });
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}

pub(super) fn dossier() -> Dossier {
    Dossier {
        notes: vec![Note {
            id: "n-1".to_string(),
            client_id: "c-1".to_string(),
            date: days_ago(5),
            author: "Verpleegkundige Bakker".to_string(),
            section: "Zorgplan".to_string(),
            text: "Cliënt is 's nachts onrustig en dwaalt over de afdeling.".to_string(),
        }],
        measures: vec![Measure {
            id: "m-1".to_string(),
            client_id: "c-1".to_string(),
            date: days_ago(20),
            measure_type: "Katz-ADL".to_string(),
            score: 5.0,
            comment: Some("volledige hulp bij wassen".to_string()),
        }],
        incidents: vec![Incident {
            id: "i-1".to_string(),
            client_id: "c-1".to_string(),
            date: days_ago(12),
            incident_type: "valincident".to_string(),
            severity: IncidentSeverity::High,
            description: "Gevallen tijdens nachtelijk dwalen.".to_string(),
        }],
    }
}

pub(super) fn context(framework_type: FrameworkType, version: &str) -> CheckContext {
    CheckContext::new("c-1", as_of(), config(framework_type, version))
        .with_form_data(complete_form())
        .with_dossier(dossier())
}

pub(super) fn passing(_: &CheckContext) -> Result<RuleOutcome, RuleError> {
    Ok(RuleOutcome::pass("ok"))
}

pub(super) fn warning(_: &CheckContext) -> Result<RuleOutcome, RuleError> {
    Ok(RuleOutcome::warning("let op"))
}

pub(super) fn erroring(_: &CheckContext) -> Result<RuleOutcome, RuleError> {
    Err(RuleError::failed("x"))
}

pub(super) fn panicking(_: &CheckContext) -> Result<RuleOutcome, RuleError> {
    panic!("predicate exploded")
}

pub(super) fn rule(id: &str, severity: Severity) -> CheckRule {
    CheckRule::new(id, format!("Regel {id}"), CheckCategory::Completeness, severity)
}

/// Registry with three custom rules: pass, warning, and one whose predicate errors.
pub(super) fn scenario_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry
        .register(rule("R1", Severity::High), passing)
        .expect("register R1");
    registry
        .register(rule("R2", Severity::Low), warning)
        .expect("register R2");
    registry
        .register(rule("R3", Severity::Critical), erroring)
        .expect("register R3");
    registry
        .register_rule_set(FrameworkType::Meerzorg, "test", ["R1", "R2", "R3"])
        .expect("register rule set");
    registry
}

pub(super) fn status_of(results: &[crate::rules::CheckResult], rule_id: &str) -> CheckStatus {
    results
        .iter()
        .find(|result| result.rule_id == rule_id)
        .map(|result| result.status)
        .unwrap_or_else(|| panic!("no result for {rule_id}"))
}
