use chrono::NaiveDate;
use serde_json::json;
use wlz_evidence::{
    FormData, FrameworkType, FrameworkVersionStore, IssueSeverity, VersionCatalog,
    VersionCatalogError, VersionManager,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date")
}

fn form(value: serde_json::Value) -> FormData {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn day_care_above_2026_limit_is_one_error() {
    let manager = VersionManager::default();
    let data = form(json!({
        "dagzorg_uren": "20",
        "duurzaamheid_onderbouwing": "Geen herstel te verwachten"
    }));

    let report = manager.validate_against_version(&data, FrameworkType::Meerzorg, "2026", as_of());

    assert!(!report.valid);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].field, "dagzorg_uren");
    assert_eq!(report.issues[0].severity, IssueSeverity::Error);
}

#[test]
fn day_care_above_limit_without_sustainability_requirement() {
    let manager = VersionManager::default();
    let data = form(json!({ "dagzorg_uren": "20" }));

    let report =
        manager.validate_against_version(&data, FrameworkType::Herindicatie, "2026", as_of());

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].field, "dagzorg_uren");
    assert_eq!(report.issues[0].severity, IssueSeverity::Error);

    let report = manager.validate_against_version(&data, FrameworkType::Meerzorg, "2026", as_of());
    let on_day_care: Vec<_> = report
        .errors()
        .filter(|issue| issue.field == "dagzorg_uren")
        .collect();
    assert_eq!(on_day_care.len(), 1);
}

#[test]
fn migrating_empty_form_adds_sustainability_placeholder() {
    let manager = VersionManager::default();

    let result = manager.migrate(&json!({}), "2025", "2026", FrameworkType::Meerzorg, as_of());

    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.migrated_fields["duurzaamheid_onderbouwing"], json!(""));
    assert!(result
        .warnings
        .iter()
        .any(|warning| warning.contains("duurzaamheid_onderbouwing")));
    assert_eq!(result.from_version, "2025");
    assert_eq!(result.to_version, "2026");
}

#[test]
fn overlapping_catalog_is_rejected_at_construction() {
    let builtin = VersionCatalog::builtin();
    let mut versions = builtin.list_versions(FrameworkType::Herindicatie);
    let mut open_2025 = versions[0].clone();
    open_2025.version = "2025-open".to_string();
    open_2025.effective_to = None;
    versions.push(open_2025);

    match VersionCatalog::new(versions) {
        Err(VersionCatalogError::Overlap { framework_type, .. }) => {
            assert_eq!(framework_type, FrameworkType::Herindicatie)
        }
        other => panic!("expected overlap rejection, got {other:?}"),
    }
}

#[test]
fn at_most_one_version_is_active_per_date() {
    let catalog = VersionCatalog::builtin();
    let mut day = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2027, 1, 1).expect("valid date");

    while day < end {
        for framework_type in [FrameworkType::Meerzorg, FrameworkType::Herindicatie] {
            let active = catalog
                .list_versions(framework_type)
                .iter()
                .filter(|version| version.is_active_on(day))
                .count();
            assert_eq!(active, 1, "{framework_type} on {day}");
        }
        day += chrono::Duration::days(7);
    }
}
