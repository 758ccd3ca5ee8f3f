//! Read-only dossier model: free-text notes, standardized measures, and incidents.

mod store;

pub use store::InMemoryDossierStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discriminator used by evidence links to point back at a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Note,
    Measure,
    Incident,
}

impl SourceType {
    pub const fn label(self) -> &'static str {
        match self {
            SourceType::Note => "note",
            SourceType::Measure => "measure",
            SourceType::Incident => "incident",
        }
    }
}

/// Free-text report written by a care professional or carer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub author: String,
    pub section: String,
    pub text: String,
}

/// Result of a standardized or local measurement instrument (Katz, NPI, MMSE, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub measure_type: String,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    #[serde(alias = "laag")]
    Low,
    #[serde(alias = "midden")]
    Medium,
    #[serde(alias = "hoog")]
    High,
    #[serde(alias = "ernstig")]
    Severe,
}

/// Registered incident such as a fall, aggression, or nightly wandering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub incident_type: String,
    pub severity: IncidentSeverity,
    pub description: String,
}

/// Borrowed view over a single dossier record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DossierRecord<'a> {
    Note(&'a Note),
    Measure(&'a Measure),
    Incident(&'a Incident),
}

impl<'a> DossierRecord<'a> {
    pub fn source_type(&self) -> SourceType {
        match self {
            DossierRecord::Note(_) => SourceType::Note,
            DossierRecord::Measure(_) => SourceType::Measure,
            DossierRecord::Incident(_) => SourceType::Incident,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            DossierRecord::Note(note) => &note.id,
            DossierRecord::Measure(measure) => &measure.id,
            DossierRecord::Incident(incident) => &incident.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            DossierRecord::Note(note) => note.date,
            DossierRecord::Measure(measure) => measure.date,
            DossierRecord::Incident(incident) => incident.date,
        }
    }

    /// Searchable text for keyword matching and snippet extraction.
    pub fn text(&self) -> String {
        match self {
            DossierRecord::Note(note) => note.text.clone(),
            DossierRecord::Measure(measure) => match &measure.comment {
                Some(comment) => format!(
                    "{} score {}: {}",
                    measure.measure_type, measure.score, comment
                ),
                None => format!("{} score {}", measure.measure_type, measure.score),
            },
            DossierRecord::Incident(incident) => {
                format!("{}: {}", incident.incident_type, incident.description)
            }
        }
    }
}

/// Inclusive date window used to restrict a dossier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EvaluationPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Owned snapshot of one client's dossier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl Dossier {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.measures.is_empty() && self.incidents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len() + self.measures.len() + self.incidents.len()
    }

    pub fn records(&self) -> impl Iterator<Item = DossierRecord<'_>> {
        self.notes
            .iter()
            .map(DossierRecord::Note)
            .chain(self.measures.iter().map(DossierRecord::Measure))
            .chain(self.incidents.iter().map(DossierRecord::Incident))
    }

    /// Look a record up by the address carried in an evidence link.
    pub fn resolve(&self, source_type: SourceType, source_id: &str) -> Option<DossierRecord<'_>> {
        match source_type {
            SourceType::Note => self
                .notes
                .iter()
                .find(|note| note.id == source_id)
                .map(DossierRecord::Note),
            SourceType::Measure => self
                .measures
                .iter()
                .find(|measure| measure.id == source_id)
                .map(DossierRecord::Measure),
            SourceType::Incident => self
                .incidents
                .iter()
                .find(|incident| incident.id == source_id)
                .map(DossierRecord::Incident),
        }
    }

    /// Copy of the dossier limited to records dated inside `period`.
    pub fn within(&self, period: &EvaluationPeriod) -> Dossier {
        Dossier {
            notes: self
                .notes
                .iter()
                .filter(|note| period.contains(note.date))
                .cloned()
                .collect(),
            measures: self
                .measures
                .iter()
                .filter(|measure| period.contains(measure.date))
                .cloned()
                .collect(),
            incidents: self
                .incidents
                .iter()
                .filter(|incident| period.contains(incident.date))
                .cloned()
                .collect(),
        }
    }
}

/// Storage boundary: the dossier store lives outside the engine.
pub trait DossierAccessor: Send + Sync {
    fn notes(&self, client_id: &str) -> Result<Vec<Note>, DossierError>;
    fn measures(&self, client_id: &str) -> Result<Vec<Measure>, DossierError>;
    fn incidents(&self, client_id: &str) -> Result<Vec<Incident>, DossierError>;

    fn dossier(&self, client_id: &str) -> Result<Dossier, DossierError> {
        Ok(Dossier {
            notes: self.notes(client_id)?,
            measures: self.measures(client_id)?,
            incidents: self.incidents(client_id)?,
        })
    }
}

/// Dossier store failure.
#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    #[error("dossier store unavailable: {0}")]
    Unavailable(String),
}
