use chrono::NaiveDate;

use crate::dossier::{DossierRecord, Incident, IncidentSeverity, Measure, Note};

const NOTE_BASE: f64 = 0.80;
const MEASURE_BASE: f64 = 0.90;
const INCIDENT_BASE: f64 = 0.85;

const PROFESSIONAL_TITLES: &[&str] = &[
    "dr",
    "drs",
    "arts",
    "specialist",
    "psycholoog",
    "verpleegkundige",
    "fysiotherapeut",
    "ergotherapeut",
    "logopedist",
    "geriater",
    "diëtist",
    "so",
    "vs",
];

const CLINICAL_SECTIONS: &[&str] = &[
    "medisch",
    "verpleegkundig",
    "behandel",
    "psycholog",
    "fysiotherap",
    "ergotherap",
    "diagnos",
    "zorgplan",
];

const STANDARDIZED_INSTRUMENTS: &[&str] = &["katz", "adl", "barthel", "mmse", "npi", "cmai"];

/// Source-specific reliability of a record as of `as_of`, clamped to [0, 1].
pub fn confidence(record: DossierRecord<'_>, as_of: NaiveDate) -> f64 {
    match record {
        DossierRecord::Note(note) => note_confidence(note, as_of),
        DossierRecord::Measure(measure) => measure_confidence(measure, as_of),
        DossierRecord::Incident(incident) => incident_confidence(incident, as_of),
    }
}

pub fn note_confidence(note: &Note, as_of: NaiveDate) -> f64 {
    let age = age_in_days(note.date, as_of);
    let mut score = NOTE_BASE;

    if age <= 30 {
        score += 0.15;
    } else if age <= 90 {
        score += 0.10;
    } else if age <= 180 {
        score += 0.05;
    } else if age > 365 {
        score -= 0.20;
    }

    if is_professional_author(&note.author) {
        score += 0.10;
    }
    if is_clinical_section(&note.section) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

pub fn measure_confidence(measure: &Measure, as_of: NaiveDate) -> f64 {
    let age = age_in_days(measure.date, as_of);
    let mut score = MEASURE_BASE;

    if age <= 30 {
        score += 0.10;
    } else if age <= 90 {
        score += 0.05;
    } else if age > 365 {
        score -= 0.30;
    } else if age > 180 {
        score -= 0.10;
    }

    if is_standardized_instrument(&measure.measure_type) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

pub fn incident_confidence(incident: &Incident, as_of: NaiveDate) -> f64 {
    let age = age_in_days(incident.date, as_of);
    let mut score = INCIDENT_BASE;

    if age <= 30 {
        score += 0.10;
    } else if age <= 90 {
        score += 0.05;
    } else if age > 365 {
        score -= 0.20;
    }

    if matches!(
        incident.severity,
        IncidentSeverity::High | IncidentSeverity::Severe
    ) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Whether the author line names a recognised care profession or title.
pub fn is_professional_author(author: &str) -> bool {
    author
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .any(|token| {
            PROFESSIONAL_TITLES.contains(&token.as_str())
                || token.ends_with("arts")
                || token.ends_with("therapeut")
                || token.contains("verpleegkundig")
        })
}

pub fn is_clinical_section(section: &str) -> bool {
    let lower = section.to_lowercase();
    CLINICAL_SECTIONS.iter().any(|marker| lower.contains(marker))
}

pub fn is_standardized_instrument(measure_type: &str) -> bool {
    let lower = measure_type.to_lowercase();
    STANDARDIZED_INSTRUMENTS
        .iter()
        .any(|instrument| lower.contains(instrument))
}

/// Whole days between the record and `as_of`; future-dated records count as fresh.
pub(crate) fn age_in_days(date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - date).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date")
    }

    fn note(days_old: i64, author: &str, section: &str) -> Note {
        Note {
            id: "n-1".to_string(),
            client_id: "c-1".to_string(),
            date: as_of() - Duration::days(days_old),
            author: author.to_string(),
            section: section.to_string(),
            text: String::new(),
        }
    }

    fn measure(days_old: i64, measure_type: &str) -> Measure {
        Measure {
            id: "m-1".to_string(),
            client_id: "c-1".to_string(),
            date: as_of() - Duration::days(days_old),
            measure_type: measure_type.to_string(),
            score: 3.0,
            comment: None,
        }
    }

    fn incident(days_old: i64, severity: IncidentSeverity) -> Incident {
        Incident {
            id: "i-1".to_string(),
            client_id: "c-1".to_string(),
            date: as_of() - Duration::days(days_old),
            incident_type: "Val".to_string(),
            severity,
            description: String::new(),
        }
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn fresh_professional_medical_note_clamps_to_one() {
        let score = note_confidence(&note(0, "Dr. Jansen", "Medisch"), as_of());
        assert!(approx(score, 1.0));
    }

    #[test]
    fn note_recency_ladder() {
        assert!(approx(note_confidence(&note(60, "Verzorgende", "Dag"), as_of()), 0.90));
        assert!(approx(note_confidence(&note(150, "Verzorgende", "Dag"), as_of()), 0.85));
        assert!(approx(note_confidence(&note(300, "Verzorgende", "Dag"), as_of()), 0.80));
        assert!(approx(note_confidence(&note(400, "Verzorgende", "Dag"), as_of()), 0.60));
    }

    #[test]
    fn measure_penalties_and_instrument_bonus() {
        assert!(approx(measure_confidence(&measure(10, "Katz-ADL"), as_of()), 1.0));
        assert!(approx(measure_confidence(&measure(60, "Pijnscore"), as_of()), 0.95));
        assert!(approx(measure_confidence(&measure(200, "Pijnscore"), as_of()), 0.80));
        assert!(approx(measure_confidence(&measure(500, "MMSE"), as_of()), 0.65));
    }

    #[test]
    fn incident_severity_bonus() {
        assert!(approx(
            incident_confidence(&incident(10, IncidentSeverity::Severe), as_of()),
            1.0
        ));
        assert!(approx(
            incident_confidence(&incident(120, IncidentSeverity::Low), as_of()),
            0.85
        ));
        assert!(approx(
            incident_confidence(&incident(400, IncidentSeverity::High), as_of()),
            0.70
        ));
    }

    #[test]
    fn professional_detection_uses_tokens() {
        assert!(is_professional_author("Dr. Jansen"));
        assert!(is_professional_author("M. de Vries, huisarts"));
        assert!(is_professional_author("Wijkverpleegkundige Bakker"));
        assert!(!is_professional_author("Martsen"));
        assert!(!is_professional_author("Dochter (mantelzorger)"));
    }

    #[test]
    fn future_dates_count_as_fresh() {
        let date = as_of() + Duration::days(5);
        assert_eq!(age_in_days(date, as_of()), 0);
    }
}
