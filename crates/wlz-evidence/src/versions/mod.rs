//! Versioned assessment frameworks: catalog, limits, deltas, validation, and migration.

mod catalog;
mod manager;
mod migration;
mod validator;

pub use catalog::{FrameworkVersionStore, VersionCatalog, VersionCatalogError};
pub use manager::{LimitChange, VersionDelta, VersionManager};
pub use migration::MigrationResult;
pub use validator::{IssueSeverity, ValidationIssue, ValidationReport};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form;

pub const FEATURE_SUSTAINABILITY_REQUIRED: &str = "sustainabilityRequired";
pub const FEATURE_NIGHT_CARE_SPLIT: &str = "nightCareSplit";
pub const FEATURE_ONE_ON_ONE_CARE: &str = "oneOnOneCare";
pub const FEATURE_DIGITAL_SUBMISSION: &str = "digitalSubmission";

pub const KNOWN_FEATURES: [&str; 4] = [
    FEATURE_SUSTAINABILITY_REQUIRED,
    FEATURE_NIGHT_CARE_SPLIT,
    FEATURE_ONE_ON_ONE_CARE,
    FEATURE_DIGITAL_SUBMISSION,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkType {
    Meerzorg,
    Herindicatie,
}

impl FrameworkType {
    pub fn label(&self) -> &'static str {
        match self {
            FrameworkType::Meerzorg => "Meerzorg",
            FrameworkType::Herindicatie => "Herindicatie",
        }
    }
}

impl fmt::Display for FrameworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown framework type '{0}' (expected meerzorg or herindicatie)")]
pub struct UnknownFrameworkType(pub String);

impl FromStr for FrameworkType {
    type Err = UnknownFrameworkType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meerzorg" => Ok(FrameworkType::Meerzorg),
            "herindicatie" => Ok(FrameworkType::Herindicatie),
            _ => Err(UnknownFrameworkType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VersionLimits {
    pub max_day_care_hours: f64,
    pub max_night_care_hours: f64,
    pub max_one_on_one_hours: f64,
    pub min_assessment_recency_days: i64,
}

impl VersionLimits {
    /// Policy fallback for framework versions that are not configured.
    pub const CONSERVATIVE: VersionLimits = VersionLimits {
        max_day_care_hours: 12.0,
        max_night_care_hours: 8.0,
        max_one_on_one_hours: 4.0,
        min_assessment_recency_days: 180,
    };

    /// Hour limit for a form field, if that field is an hour field.
    pub fn hour_limit(&self, field: &str) -> Option<f64> {
        match field {
            form::DAY_CARE_HOURS => Some(self.max_day_care_hours),
            form::NIGHT_CARE_HOURS => Some(self.max_night_care_hours),
            form::ONE_ON_ONE_HOURS => Some(self.max_one_on_one_hours),
            _ => None,
        }
    }
}

/// One entry on a framework's timeline, effective on `[effective_from, effective_to)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkVersion {
    pub framework_type: FrameworkType,
    pub version: String,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub rules: Vec<String>,
    pub limits: VersionLimits,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl FrameworkVersion {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.map_or(true, |end| date < end)
    }

    pub fn overlaps(&self, other: &FrameworkVersion) -> bool {
        let starts_before_other_ends = other
            .effective_to
            .map_or(true, |end| self.effective_from < end);
        let other_starts_before_end = self
            .effective_to
            .map_or(true, |end| other.effective_from < end);
        self.framework_type == other.framework_type
            && starts_before_other_ends
            && other_starts_before_end
    }
}

/// Fully populated view of one framework version, as consumed by rules and validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConfig {
    pub framework_type: FrameworkType,
    pub version: String,
    pub limits: VersionLimits,
    /// Every known feature flag, explicitly `true` or `false`.
    pub features: BTreeMap<String, bool>,
    pub rules: Vec<String>,
    pub required_fields: Vec<String>,
    /// Set when the pair was unknown and the conservative default was substituted.
    pub is_default: bool,
}

impl VersionConfig {
    pub fn from_version(version: &FrameworkVersion) -> Self {
        let mut features: BTreeMap<String, bool> = KNOWN_FEATURES
            .iter()
            .map(|flag| (flag.to_string(), false))
            .collect();
        features.extend(version.features.iter().map(|(flag, on)| (flag.clone(), *on)));

        Self {
            framework_type: version.framework_type,
            version: version.version.clone(),
            limits: version.limits,
            required_fields: required_fields(version.framework_type, &features),
            features,
            rules: version.rules.clone(),
            is_default: false,
        }
    }

    pub fn conservative_default(framework_type: FrameworkType, version: &str) -> Self {
        let features: BTreeMap<String, bool> = KNOWN_FEATURES
            .iter()
            .map(|flag| (flag.to_string(), false))
            .collect();

        Self {
            framework_type,
            version: version.to_string(),
            limits: VersionLimits::CONSERVATIVE,
            required_fields: required_fields(framework_type, &features),
            features,
            rules: Vec::new(),
            is_default: true,
        }
    }

    pub fn feature(&self, flag: &str) -> bool {
        self.features.get(flag).copied().unwrap_or(false)
    }
}

fn required_fields(
    framework_type: FrameworkType,
    features: &BTreeMap<String, bool>,
) -> Vec<String> {
    let mut fields = vec![form::CLIENT_NAME, form::BSN, form::CARE_PROFILE];
    fields.push(match framework_type {
        FrameworkType::Meerzorg => form::REQUEST_ARGUMENT,
        FrameworkType::Herindicatie => form::REASSESSMENT_REASON,
    });
    if features
        .get(FEATURE_SUSTAINABILITY_REQUIRED)
        .copied()
        .unwrap_or(false)
    {
        fields.push(form::SUSTAINABILITY_ARGUMENT);
    }
    fields.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(from: (i32, u32, u32), to: Option<(i32, u32, u32)>) -> FrameworkVersion {
        let date =
            |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        FrameworkVersion {
            framework_type: FrameworkType::Meerzorg,
            version: "x".to_string(),
            effective_from: date(from),
            effective_to: to.map(date),
            rules: Vec::new(),
            limits: VersionLimits::CONSERVATIVE,
            features: BTreeMap::new(),
        }
    }

    #[test]
    fn intervals_are_half_open() {
        let v = version((2025, 1, 1), Some((2026, 1, 1)));
        assert!(v.is_active_on(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")));
        assert!(v.is_active_on(NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date")));
        assert!(!v.is_active_on(NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")));

        let next = version((2026, 1, 1), None);
        assert!(!v.overlaps(&next));
        assert!(version((2025, 6, 1), None).overlaps(&v));
    }

    #[test]
    fn config_populates_every_known_feature() {
        let mut v = version((2026, 1, 1), None);
        v.features
            .insert(FEATURE_SUSTAINABILITY_REQUIRED.to_string(), true);

        let config = VersionConfig::from_version(&v);

        assert_eq!(config.features.len(), KNOWN_FEATURES.len());
        assert!(config.feature(FEATURE_SUSTAINABILITY_REQUIRED));
        assert!(!config.feature(FEATURE_ONE_ON_ONE_CARE));
        assert!(config
            .required_fields
            .contains(&form::SUSTAINABILITY_ARGUMENT.to_string()));
        assert!(!config.is_default);
    }

    #[test]
    fn framework_type_parses_case_insensitively() {
        assert_eq!("Meerzorg".parse::<FrameworkType>(), Ok(FrameworkType::Meerzorg));
        assert_eq!(" herindicatie ".parse::<FrameworkType>(), Ok(FrameworkType::Herindicatie));
        assert!("wmo".parse::<FrameworkType>().is_err());
    }
}
