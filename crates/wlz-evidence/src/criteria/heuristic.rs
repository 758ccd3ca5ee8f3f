//! Deterministic keyword polarity used when no advisory opinion is available.

use super::CriterionStatus;
use crate::evidence::EvidenceLink;

const SUPPORTING: &[&str] = &[
    "hulp nodig",
    "volledige hulp",
    "afhankelijk",
    "toezicht nodig",
    "onrustig",
    "dwaalt",
    "agressie",
    "valt",
    "niet zelfstandig",
];

const CONTRADICTING: &[&str] = &[
    "geheel zelfstandig",
    "geen hulp",
    "stabiel",
    "geen bijzonderheden",
    "verbeterd",
    "doorslaapt",
    "rustig verlopen",
];

const INCREASE: &[&str] = &["toegenomen", "toename", "meer hulp", "intensiever"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Polarity {
    pub supporting: usize,
    pub contradicting: usize,
    pub increase: bool,
}

/// Count polarity terms across all evidence snippets.
pub fn polarity(evidence: &[EvidenceLink]) -> Polarity {
    let corpus = evidence
        .iter()
        .map(|link| link.snippet.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let count = |terms: &[&str]| terms.iter().filter(|term| corpus.contains(*term)).count();

    Polarity {
        supporting: count(SUPPORTING),
        contradicting: count(CONTRADICTING),
        increase: count(INCREASE) > 0,
    }
}

/// Status from keyword polarity. With evidence but no dominant polarity the result is
/// `Deteriorated`.
pub fn determine_status(evidence: &[EvidenceLink]) -> CriterionStatus {
    if evidence.is_empty() {
        return CriterionStatus::InsufficientEvidence;
    }

    let polarity = polarity(evidence);
    if polarity.supporting > polarity.contradicting {
        if polarity.increase {
            CriterionStatus::IncreasedNeed
        } else {
            CriterionStatus::Met
        }
    } else if polarity.contradicting > polarity.supporting {
        CriterionStatus::NotMet
    } else {
        CriterionStatus::Deteriorated
    }
}

pub fn bucket_confidence(evidence_count: usize) -> f64 {
    match evidence_count {
        0 => 0.0,
        1 => 0.5,
        2 => 0.65,
        _ => 0.75,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dossier::SourceType;

    fn link(snippet: &str) -> EvidenceLink {
        EvidenceLink {
            source_type: SourceType::Note,
            source_id: "n".to_string(),
            snippet: snippet.to_string(),
            relevance: 1.0,
            confidence: 1.0,
            reason: None,
        }
    }

    #[test]
    fn supporting_terms_meet_the_criterion() {
        let evidence = [link("Cliënt is 's nachts onrustig en dwaalt.")];
        assert_eq!(determine_status(&evidence), CriterionStatus::Met);
    }

    #[test]
    fn increase_terms_signal_increased_need() {
        let evidence = [
            link("Volledige hulp bij wassen."),
            link("Onrust is toegenomen sinds vorige maand."),
        ];
        assert_eq!(determine_status(&evidence), CriterionStatus::IncreasedNeed);
    }

    #[test]
    fn contradicting_terms_reject_the_criterion() {
        let evidence = [link("Nacht rustig verlopen, cliënt doorslaapt.")];
        assert_eq!(determine_status(&evidence), CriterionStatus::NotMet);
    }

    #[test]
    fn balanced_or_neutral_evidence_falls_to_deteriorated() {
        assert_eq!(
            determine_status(&[link("Katz-ADL score 4")]),
            CriterionStatus::Deteriorated
        );
        assert_eq!(
            determine_status(&[link("Onrustig, maar verder stabiel.")]),
            CriterionStatus::Deteriorated
        );
    }

    #[test]
    fn no_evidence_is_insufficient() {
        assert_eq!(determine_status(&[]), CriterionStatus::InsufficientEvidence);
    }

    #[test]
    fn confidence_buckets() {
        assert_eq!(bucket_confidence(0), 0.0);
        assert_eq!(bucket_confidence(1), 0.5);
        assert_eq!(bucket_confidence(2), 0.65);
        assert_eq!(bucket_confidence(3), 0.75);
        assert_eq!(bucket_confidence(12), 0.75);
    }
}
