use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::confidence::confidence;
use super::keywords::derive_keywords;
use super::matcher::{extract_snippet, is_relevant, match_measure, match_text};
use super::{rank, EvidenceContext, EvidenceLink};
use crate::dossier::{Dossier, DossierRecord};

/// Link dossier records to the form field addressed by `target_path`.
///
/// The field name is the last `.` segment of the path; its value is read from the form
/// data under the full path first, then under the bare field name.
pub fn link_evidence(context: &EvidenceContext, target_path: &str) -> Vec<EvidenceLink> {
    let field = target_path.rsplit('.').next().unwrap_or(target_path);
    let value = context
        .form_data
        .get(target_path)
        .or_else(|| context.form_data.get(field));

    let keywords = derive_keywords(target_path, value);
    let links = collect_links(
        &context.dossier,
        &keywords,
        Some((field, value)),
        context.as_of,
    );

    debug!(
        client_id = %context.client_id,
        field_path = target_path,
        keywords = keywords.len(),
        links = links.len(),
        "linked evidence for form field"
    );
    links
}

/// Link dossier records against a fixed keyword query (criterion evaluation).
pub fn link_keywords<K: AsRef<str>>(
    dossier: &Dossier,
    keywords: &[K],
    as_of: NaiveDate,
) -> Vec<EvidenceLink> {
    collect_links(dossier, keywords, None, as_of)
}

fn collect_links<K: AsRef<str>>(
    dossier: &Dossier,
    keywords: &[K],
    field: Option<(&str, Option<&Value>)>,
    as_of: NaiveDate,
) -> Vec<EvidenceLink> {
    let mut links: Vec<EvidenceLink> = dossier
        .records()
        .filter_map(|record| score_record(record, keywords, field, as_of))
        .collect();
    rank(&mut links);
    links
}

fn score_record<K: AsRef<str>>(
    record: DossierRecord<'_>,
    keywords: &[K],
    field: Option<(&str, Option<&Value>)>,
    as_of: NaiveDate,
) -> Option<EvidenceLink> {
    let text = record.text();
    let textual = match_text(&text, keywords);

    let (relevance, reason) = match (record, field) {
        (DossierRecord::Measure(measure), Some((name, value))) => {
            let bonus = match_measure(measure, name, value);
            if bonus > textual.score {
                (
                    bonus,
                    Some(format!(
                        "Meetinstrument {} sluit aan op {}",
                        measure.measure_type, name
                    )),
                )
            } else {
                (textual.score, textual.reason)
            }
        }
        _ => (textual.score, textual.reason),
    };

    if !is_relevant(relevance) {
        return None;
    }

    Some(EvidenceLink {
        source_type: record.source_type(),
        source_id: record.id().to_string(),
        snippet: extract_snippet(&text, keywords),
        relevance: relevance.clamp(0.0, 1.0),
        confidence: confidence(record, as_of),
        reason,
    })
}
