use chrono::{Duration, NaiveDate};
use serde_json::json;
use wlz_evidence::evidence::confidence::note_confidence;
use wlz_evidence::evidence::{GAP_NO_EVIDENCE, GAP_SINGLE_SOURCE};
use wlz_evidence::{
    build_evidence_chain, link_evidence, Dossier, EvidenceContext, Incident, IncidentSeverity,
    Measure, Note, SourceType,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).expect("valid date")
}

fn note(id: &str, days_ago: i64, author: &str, section: &str, text: &str) -> Note {
    Note {
        id: id.to_string(),
        client_id: "client-7".to_string(),
        date: today() - Duration::days(days_ago),
        author: author.to_string(),
        section: section.to_string(),
        text: text.to_string(),
    }
}

fn dossier() -> Dossier {
    Dossier {
        notes: vec![
            note(
                "n-1",
                3,
                "Verpleegkundige de Boer",
                "Zorgplan",
                "Cliënt is 's nachts onrustig, dwaalt en heeft nachtelijk toezicht nodig.",
            ),
            note(
                "n-2",
                40,
                "Helpende Kok",
                "Dagrapportage",
                "Nacht onrustig verlopen, tweemaal uit bed.",
            ),
            note(
                "n-3",
                10,
                "Helpende Kok",
                "Dagrapportage",
                "Gezellig bezoek van kleinkinderen in de middag.",
            ),
        ],
        measures: vec![Measure {
            id: "m-1".to_string(),
            client_id: "client-7".to_string(),
            date: today() - Duration::days(60),
            measure_type: "Katz-ADL".to_string(),
            score: 5.0,
            comment: Some("Volledige hulp bij wassen".to_string()),
        }],
        incidents: vec![Incident {
            id: "i-1".to_string(),
            client_id: "client-7".to_string(),
            date: today() - Duration::days(8),
            incident_type: "Nachtelijk dwalen".to_string(),
            severity: IncidentSeverity::High,
            description: "Cliënt 's nachts aangetroffen op de gang, onrustig.".to_string(),
        }],
    }
}

fn context() -> EvidenceContext {
    let form = json!({
        "nachtzorg_uren": "8",
        "nachtzorg_toelichting": "onrustig en dwaalt 's nachts"
    });
    let form = match form {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    };
    EvidenceContext::new("client-7", today(), dossier()).with_form_data(form)
}

#[test]
fn empty_dossier_yields_no_links_and_a_single_gap() {
    let context = EvidenceContext::new("client-0", today(), Dossier::default());

    let links = link_evidence(&context, "aanvraag.nachtzorg_toelichting");
    assert!(links.is_empty());

    let chain = build_evidence_chain(
        "nachtzorg_toelichting",
        "Nachtelijk toezicht nodig",
        links,
        &context,
    );
    assert!(chain.evidence.is_empty());
    assert_eq!(chain.overall_confidence, 0.0);
    assert_eq!(chain.gaps, vec![GAP_NO_EVIDENCE.to_string()]);
}

#[test]
fn links_are_sorted_bounded_and_thresholded() {
    let context = context();

    let links = link_evidence(&context, "aanvraag.nachtzorg_toelichting");

    assert!(!links.is_empty());
    assert!(links.iter().all(|link| link.source_id != "n-3"), "{links:?}");
    for link in &links {
        assert!(link.relevance > 0.3 && link.relevance <= 1.0, "{link:?}");
        assert!((0.0..=1.0).contains(&link.confidence), "{link:?}");
    }
    for pair in links.windows(2) {
        assert!(pair[0].weight() >= pair[1].weight(), "{links:?}");
    }
}

#[test]
fn chain_confidence_is_the_strongest_link() {
    let context = context();
    let links = link_evidence(&context, "aanvraag.nachtzorg_toelichting");
    let strongest = links
        .iter()
        .map(|link| link.weight())
        .fold(0.0, f64::max);

    let chain = build_evidence_chain(
        "nachtzorg_toelichting",
        "Nachtelijk toezicht nodig",
        links,
        &context,
    );

    assert!((chain.overall_confidence - strongest).abs() < 1e-12);
    assert!(chain.is_supported());
    assert!(chain.gaps.is_empty(), "{:?}", chain.gaps);
}

#[test]
fn stale_references_are_dropped_from_the_chain() {
    let context = context();
    let mut links = link_evidence(&context, "aanvraag.nachtzorg_toelichting");
    let mut ghost = links[0].clone();
    ghost.source_type = SourceType::Note;
    ghost.source_id = "verwijderd".to_string();
    ghost.relevance = 1.0;
    ghost.confidence = 1.0;
    links.push(ghost);

    let chain = build_evidence_chain(
        "nachtzorg_toelichting",
        "Nachtelijk toezicht nodig",
        links,
        &context,
    );

    assert!(chain.evidence.iter().all(|link| link.source_id != "verwijderd"));
    assert!(chain.overall_confidence < 1.0);
}

#[test]
fn single_source_is_reported() {
    let context = context();
    let links: Vec<_> = link_evidence(&context, "aanvraag.nachtzorg_toelichting")
        .into_iter()
        .filter(|link| link.source_id == "n-1")
        .collect();
    assert_eq!(links.len(), 1);

    let chain = build_evidence_chain(
        "nachtzorg_toelichting",
        "Nachtelijk toezicht nodig",
        links,
        &context,
    );

    assert_eq!(chain.gaps, vec![GAP_SINGLE_SOURCE.to_string()]);
}

#[test]
fn professional_medical_note_from_today_is_fully_trusted() {
    let note = note("n-d", 0, "Dr. Jansen", "Medisch", "Diagnose dementie bevestigd.");
    assert_eq!(note_confidence(&note, today()), 1.0);
}
