use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    FrameworkType, FrameworkVersion, VersionLimits, FEATURE_DIGITAL_SUBMISSION,
    FEATURE_NIGHT_CARE_SPLIT, FEATURE_ONE_ON_ONE_CARE, FEATURE_SUSTAINABILITY_REQUIRED,
};
use crate::rules::builtin;

/// Source of framework versions.
pub trait FrameworkVersionStore: Send + Sync {
    /// Versions of `framework_type`, ordered by `effective_from`.
    fn list_versions(&self, framework_type: FrameworkType) -> Vec<FrameworkVersion>;

    fn get_version(&self, framework_type: FrameworkType, version: &str) -> Option<FrameworkVersion>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionCatalogError {
    #[error("{framework_type} versions {first} and {second} have overlapping effective periods")]
    Overlap {
        framework_type: FrameworkType,
        first: String,
        second: String,
    },
    #[error("{framework_type} version {version} ends before it starts")]
    InvalidInterval {
        framework_type: FrameworkType,
        version: String,
    },
    #[error("{framework_type} version {version} is defined twice")]
    Duplicate {
        framework_type: FrameworkType,
        version: String,
    },
}

/// In-memory version timeline. Construction rejects overlapping intervals per framework
/// type, so at most one version is active on any date.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    versions: BTreeMap<FrameworkType, Vec<FrameworkVersion>>,
}

impl VersionCatalog {
    pub fn new(versions: Vec<FrameworkVersion>) -> Result<Self, VersionCatalogError> {
        let mut grouped: BTreeMap<FrameworkType, Vec<FrameworkVersion>> = BTreeMap::new();

        for version in versions {
            if version
                .effective_to
                .is_some_and(|end| end <= version.effective_from)
            {
                return Err(VersionCatalogError::InvalidInterval {
                    framework_type: version.framework_type,
                    version: version.version,
                });
            }

            let timeline = grouped.entry(version.framework_type).or_default();
            if timeline.iter().any(|existing| existing.version == version.version) {
                return Err(VersionCatalogError::Duplicate {
                    framework_type: version.framework_type,
                    version: version.version,
                });
            }
            if let Some(existing) = timeline.iter().find(|existing| existing.overlaps(&version)) {
                return Err(VersionCatalogError::Overlap {
                    framework_type: version.framework_type,
                    first: existing.version.clone(),
                    second: version.version,
                });
            }
            timeline.push(version);
        }

        for timeline in grouped.values_mut() {
            timeline.sort_by_key(|version| version.effective_from);
        }

        Ok(Self { versions: grouped })
    }

    /// Meerzorg and Herindicatie, versions 2025 and 2026.
    pub fn builtin() -> Self {
        let mut versions = BTreeMap::new();
        for framework_type in [FrameworkType::Meerzorg, FrameworkType::Herindicatie] {
            versions.insert(
                framework_type,
                vec![
                    builtin_version(framework_type, "2025"),
                    builtin_version(framework_type, "2026"),
                ],
            );
        }
        Self { versions }
    }

    pub fn active_version(
        &self,
        framework_type: FrameworkType,
        date: NaiveDate,
    ) -> Option<&FrameworkVersion> {
        self.versions
            .get(&framework_type)?
            .iter()
            .find(|version| version.is_active_on(date))
    }
}

impl FrameworkVersionStore for VersionCatalog {
    fn list_versions(&self, framework_type: FrameworkType) -> Vec<FrameworkVersion> {
        self.versions
            .get(&framework_type)
            .cloned()
            .unwrap_or_default()
    }

    fn get_version(
        &self,
        framework_type: FrameworkType,
        version: &str,
    ) -> Option<FrameworkVersion> {
        self.versions
            .get(&framework_type)?
            .iter()
            .find(|candidate| candidate.version == version)
            .cloned()
    }
}

fn builtin_version(framework_type: FrameworkType, version: &str) -> FrameworkVersion {
    let date = |year| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
    let is_2026 = version == "2026";

    let limits = if is_2026 {
        VersionLimits {
            max_day_care_hours: 16.0,
            max_night_care_hours: 12.0,
            max_one_on_one_hours: 8.0,
            min_assessment_recency_days: 180,
        }
    } else {
        VersionLimits {
            max_day_care_hours: 14.0,
            max_night_care_hours: 10.0,
            max_one_on_one_hours: 6.0,
            min_assessment_recency_days: 365,
        }
    };

    let meerzorg = framework_type == FrameworkType::Meerzorg;
    let features = BTreeMap::from([
        (FEATURE_SUSTAINABILITY_REQUIRED.to_string(), meerzorg && is_2026),
        (FEATURE_NIGHT_CARE_SPLIT.to_string(), true),
        (FEATURE_ONE_ON_ONE_CARE.to_string(), meerzorg),
        (FEATURE_DIGITAL_SUBMISSION.to_string(), is_2026),
    ]);

    FrameworkVersion {
        framework_type,
        version: version.to_string(),
        effective_from: if is_2026 { date(2026) } else { date(2025) },
        effective_to: if is_2026 { None } else { Some(date(2026)) },
        rules: builtin::rule_set(framework_type, version)
            .iter()
            .map(|id| id.to_string())
            .collect(),
        limits,
        features,
    }
}
