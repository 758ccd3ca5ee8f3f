use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CheckResult, CheckStatus, Severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Aggregate used by callers to decide whether a submission may go out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub by_severity: BTreeMap<Severity, SeverityCounts>,
    /// Critical failures; any entry blocks submission.
    pub blocking_issues: Vec<CheckResult>,
    pub ready_for_submission: bool,
}

pub fn summarize(results: &[CheckResult]) -> CheckSummary {
    let mut by_severity: BTreeMap<Severity, SeverityCounts> = BTreeMap::new();
    let (mut passed, mut failed, mut warnings) = (0, 0, 0);

    for result in results {
        let counts = by_severity.entry(result.severity).or_default();
        match result.status {
            CheckStatus::Pass => {
                passed += 1;
                counts.passed += 1;
            }
            CheckStatus::Fail => {
                failed += 1;
                counts.failed += 1;
            }
            CheckStatus::Warning => {
                warnings += 1;
                counts.warnings += 1;
            }
        }
    }

    let blocking_issues: Vec<CheckResult> = results
        .iter()
        .filter(|result| result.is_blocking())
        .cloned()
        .collect();

    CheckSummary {
        total: results.len(),
        passed,
        failed,
        warnings,
        by_severity,
        ready_for_submission: blocking_issues.is_empty(),
        blocking_issues,
    }
}
