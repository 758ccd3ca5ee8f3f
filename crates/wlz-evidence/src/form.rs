//! Typed access to the loosely-typed form payload (`serde_json` object).
//!
//! Hour fields arrive as numbers or as strings such as `"20"` or `"12,5"`; empty strings
//! and `null` count as "not filled in".

use chrono::NaiveDate;
use serde_json::{Map, Value};

pub type FormData = Map<String, Value>;

pub const CLIENT_NAME: &str = "client_naam";
pub const BSN: &str = "bsn";
pub const CARE_PROFILE: &str = "zorgprofiel";
pub const REQUEST_ARGUMENT: &str = "aanvraag_toelichting";
pub const REASSESSMENT_REASON: &str = "reden_herindicatie";
pub const DAY_CARE_HOURS: &str = "dagzorg_uren";
pub const NIGHT_CARE_HOURS: &str = "nachtzorg_uren";
pub const ONE_ON_ONE_HOURS: &str = "een_op_een_uren";
pub const SUSTAINABILITY_ARGUMENT: &str = "duurzaamheid_onderbouwing";
pub const ASSESSMENT_DATE: &str = "laatste_indicatiedatum";
pub const BEHAVIOUR_ARGUMENT: &str = "gedrag_toelichting";

pub const HOUR_FIELDS: [&str; 3] = [DAY_CARE_HOURS, NIGHT_CARE_HOURS, ONE_ON_ONE_HOURS];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldValueError {
    #[error("veld '{field}' bevat geen geldig aantal uren: {value}")]
    NotNumeric { field: String, value: String },
    #[error("veld '{field}' bevat een negatief aantal uren: {value}")]
    Negative { field: String, value: f64 },
    #[error("veld '{field}' bevat geen geldige datum (JJJJ-MM-DD): {value}")]
    InvalidDate { field: String, value: String },
}

/// True when the field holds something other than `null` or a blank string.
pub fn is_filled(form: &FormData, field: &str) -> bool {
    match form.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

pub fn text<'a>(form: &'a FormData, field: &str) -> Option<&'a str> {
    match form.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim()),
        _ => None,
    }
}

/// Hours requested in `field`; `Ok(None)` when the field is not filled in.
pub fn hours(form: &FormData, field: &str) -> Result<Option<f64>, FieldValueError> {
    let parsed = match form.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) if raw.trim().is_empty() => return Ok(None),
        Some(Value::String(raw)) => raw.trim().replace(',', ".").parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(value) if value.is_finite() && value < 0.0 => Err(FieldValueError::Negative {
            field: field.to_string(),
            value,
        }),
        Some(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(FieldValueError::NotNumeric {
            field: field.to_string(),
            value: render(form.get(field)),
        }),
    }
}

pub fn date(form: &FormData, field: &str) -> Result<Option<NaiveDate>, FieldValueError> {
    match text(form, field) {
        None if is_filled(form, field) => Err(FieldValueError::InvalidDate {
            field: field.to_string(),
            value: render(form.get(field)),
        }),
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FieldValueError::InvalidDate {
                field: field.to_string(),
                value: raw.to_string(),
            }),
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
