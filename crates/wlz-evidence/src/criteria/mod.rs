//! VV8 criterion evaluation: advisory opinion first, keyword heuristic as fallback.

mod advisory;
mod evaluator;
pub mod heuristic;

pub use advisory::{AdvisoryContextCache, AdvisoryError, AdvisoryOpinion, AdvisoryService};
pub use evaluator::CriterionEvaluator;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionStatus {
    #[serde(rename = "unknown", alias = "onbekend")]
    Unknown,
    #[serde(rename = "voldoet")]
    Met,
    #[serde(rename = "niet_voldoet")]
    NotMet,
    #[serde(rename = "onvoldoende_bewijs")]
    InsufficientEvidence,
    #[serde(rename = "toegenomen_behoefte")]
    IncreasedNeed,
    #[serde(rename = "verslechterd")]
    Deteriorated,
}

impl CriterionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CriterionStatus::Unknown => "onbekend",
            CriterionStatus::Met => "voldoet",
            CriterionStatus::NotMet => "voldoet niet",
            CriterionStatus::InsufficientEvidence => "onvoldoende bewijs",
            CriterionStatus::IncreasedNeed => "toegenomen zorgbehoefte",
            CriterionStatus::Deteriorated => "verslechterd",
        }
    }
}

/// Static description of a criterion and the keyword query used to find its evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDefinition {
    pub id: String,
    pub label: String,
    pub description: String,
    pub keywords: Vec<String>,
}

const VV8: &[(&str, &str, &str, &[&str])] = &[
    (
        "adl",
        "Algemene dagelijkse levensverrichtingen",
        "Hulp bij wassen, aankleden, eten en toiletgang.",
        &["adl", "katz", "barthel", "wassen", "aankleden", "toiletgang", "eten"],
    ),
    (
        "nachtelijk_toezicht",
        "Nachtelijk toezicht",
        "Onplanbare zorg of toezicht gedurende de nacht.",
        &["nacht", "nachtelijk", "onrustig", "dwaalt", "slaap", "toezicht"],
    ),
    (
        "gedrag",
        "Probleemgedrag",
        "Gedragsproblematiek die begeleiding of toezicht vraagt.",
        &["gedrag", "agressie", "onrust", "bpsd", "npi", "cmai", "ontremd"],
    ),
    (
        "communicatie",
        "Communicatie",
        "Zich verstaanbaar maken en anderen begrijpen.",
        &["communicatie", "begrijpt", "afasie", "spreken", "taal"],
    ),
    (
        "mobiliteit",
        "Mobiliteit",
        "Lopen, transfers en valrisico.",
        &["mobiliteit", "lopen", "transfer", "rolstoel", "valt", "val", "tinetti"],
    ),
    (
        "psychisch",
        "Psychisch functioneren",
        "Cognitie, stemming en geheugen.",
        &["psychisch", "cognitie", "geheugen", "mmse", "somber", "angst", "depressie"],
    ),
    (
        "sociaal",
        "Sociale redzaamheid",
        "Contacten onderhouden en deelnemen aan activiteiten.",
        &["sociaal", "contact", "eenzaam", "activiteit", "familie"],
    ),
    (
        "zelfstandigheid",
        "Zelfstandigheid",
        "Regie over het eigen leven en beslissingen nemen.",
        &["zelfstandig", "regie", "beslissing", "afhankelijk"],
    ),
];

impl CriterionDefinition {
    pub fn new<K, S>(id: impl Into<String>, label: impl Into<String>, keywords: K) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// The eight VV8 criteria, in assessment order.
    pub fn vv8() -> Vec<CriterionDefinition> {
        VV8.iter()
            .map(|(id, label, description, keywords)| CriterionDefinition {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
                keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
            })
            .collect()
    }

    pub fn find(id: &str) -> Option<CriterionDefinition> {
        Self::vv8().into_iter().find(|criterion| criterion.id == id)
    }
}

/// A resolved criterion with the evidence it rests on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub label: String,
    pub status: CriterionStatus,
    pub argument: String,
    pub evidence: Vec<EvidenceLink>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<String>,
}
