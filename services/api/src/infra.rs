use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wlz_evidence::config::EngineConfig;
use wlz_evidence::{
    AdvisoryContextCache, CriterionEvaluator, InMemoryDossierStore, NormativeRuleEngine,
    VersionManager,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine components shared by every request.
pub(crate) struct EngineState {
    pub(crate) dossiers: Arc<InMemoryDossierStore>,
    pub(crate) versions: VersionManager,
    pub(crate) rules: NormativeRuleEngine,
    pub(crate) criteria: CriterionEvaluator<InMemoryDossierStore>,
    pub(crate) advisory_cache: Arc<AdvisoryContextCache>,
    pub(crate) config: EngineConfig,
}

impl EngineState {
    pub(crate) fn new(config: EngineConfig) -> Self {
        Self::with_store(Arc::new(InMemoryDossierStore::new()), config)
    }

    pub(crate) fn with_store(dossiers: Arc<InMemoryDossierStore>, config: EngineConfig) -> Self {
        let advisory_cache = Arc::new(AdvisoryContextCache::new());
        let criteria =
            CriterionEvaluator::new(dossiers.clone(), &config).with_cache(advisory_cache.clone());

        Self {
            dossiers,
            versions: VersionManager::default(),
            rules: NormativeRuleEngine::builtin(),
            criteria,
            advisory_cache,
            config,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
