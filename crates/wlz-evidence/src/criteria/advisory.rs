use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CriterionDefinition, CriterionStatus};
use crate::dossier::Dossier;
use crate::evidence::EvidenceLink;

/// External opinion on one criterion, typically backed by a language model.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn evaluate(
        &self,
        criterion: &CriterionDefinition,
        evidence: &[EvidenceLink],
        context: &str,
    ) -> Result<AdvisoryOpinion, AdvisoryError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryOpinion {
    pub status: CriterionStatus,
    pub argument: String,
    pub confidence: f64,
    #[serde(default)]
    pub uncertainty: Option<String>,
}

impl AdvisoryOpinion {
    /// Usable as-is: a decided status, a finite confidence in `[0, 1]`, and an argument.
    pub fn is_well_formed(&self) -> bool {
        self.status != CriterionStatus::Unknown
            && self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
            && !self.argument.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory service unavailable: {0}")]
    Unavailable(String),
    #[error("advisory service returned an unusable response: {0}")]
    InvalidResponse(String),
}

const MAX_CONTEXT_RECORDS: usize = 40;

/// Prepared advisory context per client.
///
/// Shared by `Arc` between the evaluator and whatever owns dossier updates; the owner
/// calls [`invalidate`](Self::invalidate) when a client's dossier changes.
#[derive(Debug, Default)]
pub struct AdvisoryContextCache {
    entries: RwLock<HashMap<String, Arc<str>>>,
}

impl AdvisoryContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store the context for `client_id`, replacing any previous entry.
    pub fn init(&self, client_id: &str, dossier: &Dossier) -> Arc<str> {
        let context: Arc<str> = Arc::from(render_context(dossier));
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(client_id.to_string(), Arc::clone(&context));
        context
    }

    pub fn get(&self, client_id: &str) -> Option<Arc<str>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(client_id).cloned()
    }

    pub fn get_or_init(&self, client_id: &str, dossier: &Dossier) -> Arc<str> {
        match self.get(client_id) {
            Some(context) => context,
            None => self.init(client_id, dossier),
        }
    }

    pub fn invalidate(&self, client_id: &str) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(client_id);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newest records first, one line each.
fn render_context(dossier: &Dossier) -> String {
    let mut records: Vec<_> = dossier.records().collect();
    records.sort_by(|left, right| right.date().cmp(&left.date()));

    records
        .iter()
        .take(MAX_CONTEXT_RECORDS)
        .map(|record| {
            format!(
                "[{}] {} {}: {}",
                record.date(),
                record.source_type().label(),
                record.id(),
                record.text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::dossier::Note;

    fn note(id: &str, day: u32, text: &str) -> Note {
        Note {
            id: id.to_string(),
            client_id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, day).expect("valid date"),
            author: "Zorgmedewerker".to_string(),
            section: "Dagrapportage".to_string(),
            text: text.to_string(),
        }
    }

    fn dossier() -> Dossier {
        Dossier {
            notes: vec![note("n-1", 3, "Eerste"), note("n-2", 9, "Tweede")],
            ..Dossier::default()
        }
    }

    #[test]
    fn context_lists_newest_record_first() {
        let cache = AdvisoryContextCache::new();
        let context = cache.init("c-1", &dossier());

        let first_line = context.lines().next().expect("one line");
        assert!(first_line.contains("n-2"), "{first_line}");
        assert!(first_line.contains("Tweede"));
    }

    #[test]
    fn lifecycle_init_get_invalidate() {
        let cache = AdvisoryContextCache::new();
        assert!(cache.get("c-1").is_none());

        let first = cache.get_or_init("c-1", &dossier());
        let again = cache.get_or_init("c-1", &Dossier::default());
        assert!(Arc::ptr_eq(&first, &again));

        cache.init("c-2", &Dossier::default());
        assert_eq!(cache.len(), 2);

        cache.invalidate("c-1");
        assert!(cache.get("c-1").is_none());
        assert!(cache.get("c-2").is_some());

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_opinions_are_detected() {
        let good = AdvisoryOpinion {
            status: CriterionStatus::Met,
            argument: "Katz-score 5".to_string(),
            confidence: 0.8,
            uncertainty: None,
        };
        assert!(good.is_well_formed());

        let mut unknown = good.clone();
        unknown.status = CriterionStatus::Unknown;
        assert!(!unknown.is_well_formed());

        let mut overconfident = good.clone();
        overconfident.confidence = 1.4;
        assert!(!overconfident.is_well_formed());

        let mut nan = good.clone();
        nan.confidence = f64::NAN;
        assert!(!nan.is_well_formed());

        let mut silent = good;
        silent.argument = "  ".to_string();
        assert!(!silent.is_well_formed());
    }
}
