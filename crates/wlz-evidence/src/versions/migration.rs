use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validator::assessment_recency;
use super::VersionConfig;
use crate::form::{self, FormData};

/// Outcome of moving stored form data to another framework version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub success: bool,
    pub from_version: String,
    pub to_version: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Input fields plus placeholders for newly required fields. Nothing is removed.
    pub migrated_fields: FormData,
}

pub(super) fn migrate(
    form_data: &Value,
    source: &VersionConfig,
    target: &VersionConfig,
    as_of: NaiveDate,
) -> MigrationResult {
    let mut result = MigrationResult {
        success: true,
        from_version: source.version.clone(),
        to_version: target.version.clone(),
        warnings: Vec::new(),
        errors: Vec::new(),
        migrated_fields: FormData::new(),
    };

    let Value::Object(fields) = form_data else {
        result.success = false;
        result.errors.push(format!(
            "Formuliergegevens moeten een object zijn, ontvangen: {}",
            json_kind(form_data)
        ));
        return result;
    };
    let mut migrated = fields.clone();

    for field in form::HOUR_FIELDS {
        let Some(limit) = target.limits.hour_limit(field) else {
            continue;
        };
        match form::hours(&migrated, field) {
            Ok(Some(hours)) if hours > limit => result.warnings.push(format!(
                "Veld '{field}' ({hours} uur) overschrijdt het maximum van {limit} uur \
                 in versie {}",
                target.version
            )),
            Ok(_) => {}
            Err(error) => result.warnings.push(error.to_string()),
        }
    }

    for field in &target.required_fields {
        if source.required_fields.contains(field) || form::is_filled(&migrated, field) {
            continue;
        }
        migrated.insert(field.clone(), Value::String(String::new()));
        result.warnings.push(format!(
            "Nieuw verplicht veld '{field}' toegevoegd voor versie {}; vul dit aan",
            target.version
        ));
    }

    if let Some(issue) = assessment_recency(&migrated, target, as_of) {
        result.warnings.push(issue.message);
    }

    result.migrated_fields = migrated;
    result
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "getal",
        Value::String(_) => "tekst",
        Value::Array(_) => "lijst",
        Value::Object(_) => "object",
    }
}
