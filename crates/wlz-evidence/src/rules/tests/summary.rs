use std::sync::Arc;

use super::common::*;
use crate::rules::{summarize, CheckStatus, FrameworkSelector, NormativeRuleEngine, Severity};
use crate::versions::FrameworkType;

#[test]
fn summary_counts_statuses_per_severity() {
    let engine = NormativeRuleEngine::new(Arc::new(scenario_registry()));
    let results = engine.execute_normative_checks(
        &context(FrameworkType::Meerzorg, "2025"),
        &FrameworkSelector::new(FrameworkType::Meerzorg, "test"),
    );

    let summary = summarize(&results);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.warnings, 1);
    assert_eq!(summary.by_severity[&Severity::High].passed, 1);
    assert_eq!(summary.by_severity[&Severity::Low].warnings, 1);
    // Errors are downgraded to medium, so nothing blocks.
    assert_eq!(summary.by_severity[&Severity::Medium].failed, 1);
    assert!(summary.blocking_issues.is_empty());
    assert!(summary.ready_for_submission);
}

#[test]
fn critical_failure_blocks_submission() {
    let engine = NormativeRuleEngine::builtin();
    let mut context = context(FrameworkType::Meerzorg, "2025");
    context.form_data.remove("client_naam");

    let selector = FrameworkSelector::new(FrameworkType::Meerzorg, "2025");
    let results = engine.execute_normative_checks(&context, &selector);
    let summary = summarize(&results);

    assert!(!summary.ready_for_submission);
    assert_eq!(summary.blocking_issues.len(), 1);
    assert_eq!(summary.blocking_issues[0].rule_id, "REQ-CLIENT-NAAM");
    assert_eq!(summary.blocking_issues[0].status, CheckStatus::Fail);
}

#[test]
fn empty_results_are_ready() {
    let summary = summarize(&[]);
    assert_eq!(summary.total, 0);
    assert!(summary.by_severity.is_empty());
    assert!(summary.ready_for_submission);
}
