use serde::{Deserialize, Serialize};
use tracing::debug;

use super::confidence::{age_in_days, is_professional_author};
use super::{rank, EvidenceContext, EvidenceLink};
use crate::dossier::DossierRecord;

pub const GAP_NO_EVIDENCE: &str = "Geen ondersteunend bewijs gevonden";
pub const GAP_LOW_RELIABILITY: &str =
    "Lage betrouwbaarheid: geen enkele bron heeft een betrouwbaarheid van 0,5 of hoger";
pub const GAP_STALE_EVIDENCE: &str = "Meest recente bewijs is ouder dan 180 dagen";
pub const GAP_SINGLE_SOURCE: &str = "Slechts één bron onderbouwt deze claim";
pub const GAP_NO_PROFESSIONAL: &str = "Geen professionele beoordeling gevonden";

const LOW_RELIABILITY_THRESHOLD: f64 = 0.5;
const STALE_AFTER_DAYS: i64 = 180;
const CLINICAL_TARGETS: &[&str] = &["adl", "bpsd", "medisch", "diagnose", "specialist"];

/// Ranked, gap-annotated evidence for a single claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceChain {
    pub target: String,
    pub claim: String,
    pub evidence: Vec<EvidenceLink>,
    pub overall_confidence: f64,
    pub gaps: Vec<String>,
}

impl EvidenceChain {
    pub fn is_supported(&self) -> bool {
        !self.evidence.is_empty()
    }
}

/// Highest `relevance × confidence` over the links, or 0 when there are none.
pub fn overall_confidence(links: &[EvidenceLink]) -> f64 {
    links
        .iter()
        .map(EvidenceLink::weight)
        .fold(0.0, f64::max)
}

/// Resolve `links` against the context dossier and annotate the gaps.
///
/// Links whose record no longer exists are dropped and caller-supplied scores are clamped
/// to `[0, 1]`. Gap messages are appended in a fixed order so repeated builds produce
/// identical output.
pub fn build_evidence_chain(
    target: &str,
    claim: &str,
    links: Vec<EvidenceLink>,
    context: &EvidenceContext,
) -> EvidenceChain {
    let offered = links.len();
    let resolved: Vec<(EvidenceLink, DossierRecord<'_>)> = links
        .into_iter()
        .filter_map(|link| {
            context
                .dossier
                .resolve(link.source_type, &link.source_id)
                .map(|record| (link.clamped(), record))
        })
        .collect();

    if resolved.len() < offered {
        debug!(
            claim_target = target,
            dropped = offered - resolved.len(),
            "dropped evidence links without a matching dossier record"
        );
    }

    let gaps = analyse_gaps(target, &resolved, context);

    let mut evidence: Vec<EvidenceLink> = resolved.into_iter().map(|(link, _)| link).collect();
    rank(&mut evidence);

    EvidenceChain {
        target: target.to_string(),
        claim: claim.to_string(),
        overall_confidence: overall_confidence(&evidence),
        evidence,
        gaps,
    }
}

fn analyse_gaps(
    target: &str,
    resolved: &[(EvidenceLink, DossierRecord<'_>)],
    context: &EvidenceContext,
) -> Vec<String> {
    if resolved.is_empty() {
        return vec![GAP_NO_EVIDENCE.to_string()];
    }

    let mut gaps = Vec::new();

    let max_confidence = resolved
        .iter()
        .map(|(link, _)| link.confidence)
        .fold(0.0, f64::max);
    if max_confidence < LOW_RELIABILITY_THRESHOLD {
        gaps.push(GAP_LOW_RELIABILITY.to_string());
    }

    let newest = resolved.iter().map(|(_, record)| record.date()).max();
    if let Some(newest) = newest {
        if age_in_days(newest, context.as_of) > STALE_AFTER_DAYS {
            gaps.push(GAP_STALE_EVIDENCE.to_string());
        }
    }

    if resolved.len() == 1 {
        gaps.push(GAP_SINGLE_SOURCE.to_string());
    }

    let target_lower = target.to_lowercase();
    let clinical_target = CLINICAL_TARGETS
        .iter()
        .any(|keyword| target_lower.contains(keyword));
    let professional = resolved.iter().any(|(_, record)| match record {
        DossierRecord::Measure(_) => true,
        DossierRecord::Note(note) => is_professional_author(&note.author),
        DossierRecord::Incident(_) => false,
    });
    if clinical_target && !professional {
        gaps.push(GAP_NO_PROFESSIONAL.to_string());
    }

    gaps
}
