use super::common::*;
use crate::dossier::Measure;
use crate::rules::builtin::{self, is_valid_bsn};
use crate::rules::{
    CheckCategory, CheckContext, CheckResult, CheckStatus, FrameworkSelector, NormativeRuleEngine,
    Severity,
};
use crate::versions::{FrameworkType, FEATURE_ONE_ON_ONE_CARE};

fn run(context: &CheckContext, framework_type: FrameworkType, version: &str) -> Vec<CheckResult> {
    NormativeRuleEngine::builtin()
        .execute_normative_checks(context, &FrameworkSelector::new(framework_type, version))
}

#[test]
fn complete_submission_passes_every_builtin_rule_set() {
    for (framework_type, version, _) in builtin::RULE_SETS {
        let results = run(&context(*framework_type, version), *framework_type, version);
        let failing: Vec<_> = results
            .iter()
            .filter(|result| result.status != CheckStatus::Pass)
            .collect();
        assert!(failing.is_empty(), "{framework_type:?} {version}: {failing:?}");
    }
}

#[test]
fn day_care_above_version_limit_fails() {
    let mut context = context(FrameworkType::Meerzorg, "2026");
    context.form_data.insert("dagzorg_uren".into(), "20".into());

    let results = run(&context, FrameworkType::Meerzorg, "2026");

    let day_care = results
        .iter()
        .find(|result| result.rule_id == builtin::TK_DAY_CARE_LIMIT)
        .expect("day care result");
    assert_eq!(day_care.status, CheckStatus::Fail);
    assert_eq!(day_care.severity, Severity::Critical);
    assert!(day_care.message.contains("16"), "{}", day_care.message);
}

#[test]
fn unparsable_hours_fail_as_evaluation_error() {
    let mut context = context(FrameworkType::Meerzorg, "2025");
    context.form_data.insert("nachtzorg_uren".into(), "de hele nacht".into());

    let results = run(&context, FrameworkType::Meerzorg, "2025");

    for rule_id in [builtin::TK_NIGHT_CARE_LIMIT, builtin::CON_NIGHT_CARE_EVIDENCE] {
        let result = results
            .iter()
            .find(|result| result.rule_id == rule_id)
            .expect("night care result");
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.category, CheckCategory::Consistency);
        assert_eq!(result.severity, Severity::Medium);
    }
}

#[test]
fn one_on_one_hours_require_the_feature() {
    let mut context = context(FrameworkType::Meerzorg, "2025");
    context
        .config
        .features
        .insert(FEATURE_ONE_ON_ONE_CARE.to_string(), false);

    let results = run(&context, FrameworkType::Meerzorg, "2025");

    assert_eq!(
        status_of(&results, builtin::TK_ONE_ON_ONE_LIMIT),
        CheckStatus::Fail
    );
}

#[test]
fn adl_measure_is_checked_against_recency_window() {
    let mut context = context(FrameworkType::Herindicatie, "2026");
    context.dossier.measures[0].date = days_ago(200);
    let results = run(&context, FrameworkType::Herindicatie, "2026");
    assert_eq!(status_of(&results, builtin::CMP_ADL_MEASURE), CheckStatus::Warning);

    context.dossier.measures.clear();
    let results = run(&context, FrameworkType::Herindicatie, "2026");
    assert_eq!(status_of(&results, builtin::CMP_ADL_MEASURE), CheckStatus::Fail);
}

#[test]
fn behaviour_argument_needs_behaviour_measure() {
    let mut context = context(FrameworkType::Meerzorg, "2026");
    context
        .form_data
        .insert("gedrag_toelichting".into(), "Agressie naar medebewoners".into());
    let results = run(&context, FrameworkType::Meerzorg, "2026");
    assert_eq!(status_of(&results, builtin::CMP_BEHAVIOUR_MEASURE), CheckStatus::Fail);

    context.dossier.measures.push(Measure {
        id: "m-npi".to_string(),
        client_id: "c-1".to_string(),
        date: days_ago(30),
        measure_type: "NPI".to_string(),
        score: 24.0,
        comment: None,
    });
    let results = run(&context, FrameworkType::Meerzorg, "2026");
    assert_eq!(status_of(&results, builtin::CMP_BEHAVIOUR_MEASURE), CheckStatus::Pass);
}

#[test]
fn stale_reporting_is_a_warning() {
    let mut context = context(FrameworkType::Meerzorg, "2025");
    context.dossier.notes[0].date = days_ago(120);

    let results = run(&context, FrameworkType::Meerzorg, "2025");

    assert_eq!(status_of(&results, builtin::CMP_RECENT_REPORTING), CheckStatus::Warning);
}

#[test]
fn night_care_without_night_records_fails() {
    let mut context = context(FrameworkType::Meerzorg, "2025");
    context.dossier.notes[0].text = "Overdag rustig, eet goed.".to_string();
    context.dossier.incidents[0].description = "Gevallen in de badkamer.".to_string();

    let results = run(&context, FrameworkType::Meerzorg, "2025");

    assert_eq!(status_of(&results, builtin::CON_NIGHT_CARE_EVIDENCE), CheckStatus::Fail);
}

#[test]
fn care_profile_must_be_vv_one_to_ten() {
    let mut context = context(FrameworkType::Herindicatie, "2025");
    context.form_data.insert("zorgprofiel".into(), "ZZP5".into());
    let results = run(&context, FrameworkType::Herindicatie, "2025");
    assert_eq!(status_of(&results, builtin::TK_CARE_PROFILE_FORMAT), CheckStatus::Fail);

    context.form_data.insert("zorgprofiel".into(), "vv 10".into());
    let results = run(&context, FrameworkType::Herindicatie, "2025");
    assert_eq!(status_of(&results, builtin::TK_CARE_PROFILE_FORMAT), CheckStatus::Pass);
}

#[test]
fn bsn_checksum() {
    assert!(is_valid_bsn("111222333"));
    assert!(is_valid_bsn("1112.22.333"));
    assert!(!is_valid_bsn("123456789"));
    assert!(!is_valid_bsn("000000000"));
    assert!(!is_valid_bsn("12345"));
    assert!(!is_valid_bsn("11122233a"));
}

#[test]
fn herindicatie_rule_sets_do_not_check_hours() {
    let ids = builtin::rule_set(FrameworkType::Herindicatie, "2026");
    assert!(!ids.contains(&builtin::TK_DAY_CARE_LIMIT));
    assert!(ids.contains(&builtin::REQ_REASSESSMENT_REASON));
    assert!(builtin::rule_set(FrameworkType::Meerzorg, "1999").is_empty());
}
