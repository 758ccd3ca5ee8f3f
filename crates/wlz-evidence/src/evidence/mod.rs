//! Evidence matching, scoring, linking, and chain assembly.

mod chain;
pub mod confidence;
pub mod keywords;
mod linker;
pub mod matcher;

pub use chain::{
    build_evidence_chain, overall_confidence, EvidenceChain, GAP_LOW_RELIABILITY,
    GAP_NO_EVIDENCE, GAP_NO_PROFESSIONAL, GAP_SINGLE_SOURCE, GAP_STALE_EVIDENCE,
};
pub use linker::{link_evidence, link_keywords};
pub use matcher::{MatchResult, RELEVANCE_THRESHOLD};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dossier::{Dossier, SourceType};

/// Pointer from a claim to one dossier record, with its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceLink {
    pub source_type: SourceType,
    pub source_id: String,
    pub snippet: String,
    pub relevance: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EvidenceLink {
    /// Ranking weight: relevance times confidence.
    pub fn weight(&self) -> f64 {
        self.relevance * self.confidence
    }

    /// Scores forced into `[0, 1]`; non-finite scores become 0.
    pub(crate) fn clamped(mut self) -> Self {
        self.relevance = unit_interval(self.relevance);
        self.confidence = unit_interval(self.confidence);
        self
    }
}

fn unit_interval(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Everything the linker and chain builder read for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceContext {
    pub client_id: String,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub dossier: Dossier,
    #[serde(default)]
    pub form_data: Map<String, Value>,
}

impl EvidenceContext {
    pub fn new(client_id: impl Into<String>, as_of: NaiveDate, dossier: Dossier) -> Self {
        Self {
            client_id: client_id.into(),
            as_of,
            dossier,
            form_data: Map::new(),
        }
    }

    pub fn with_form_data(mut self, form_data: Map<String, Value>) -> Self {
        self.form_data = form_data;
        self
    }
}

/// Sort links by descending weight; ties keep their input order.
pub(crate) fn rank(links: &mut [EvidenceLink]) {
    links.sort_by(|left, right| right.weight().total_cmp(&left.weight()));
}
