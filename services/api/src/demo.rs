use crate::infra::EngineState;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use wlz_evidence::config::EngineConfig;
use wlz_evidence::error::AppError;
use wlz_evidence::{
    build_evidence_chain, link_evidence, summarize, CheckContext, CheckStatus, Dossier,
    DossierAccessor, EvaluationPeriod, EvidenceContext, FormData, FrameworkSelector,
    FrameworkType, Incident, IncidentSeverity, Measure, Note,
};

const DEMO_CLIENT: &str = "demo-client";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Framework version to check the claim against. Defaults to the active version.
    #[arg(long)]
    pub(crate) version: Option<String>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let engine = Arc::new(EngineState::new(EngineConfig::default()));
    engine
        .dossiers
        .insert(DEMO_CLIENT, synthetic_dossier(today));

    let version = match args.version {
        Some(version) => version,
        None => engine
            .versions
            .active_version(FrameworkType::Meerzorg, today)
            .map(|version| version.version)
            .ok_or_else(|| {
                AppError::NotFound(format!("no Meerzorg version active on {today}"))
            })?,
    };
    let form_data = synthetic_form(today);
    let dossier = engine.dossiers.dossier(DEMO_CLIENT)?;

    println!("WLZ evidence demo for {DEMO_CLIENT} (as of {today})");
    println!(
        "- dossier: {} notes | {} measures | {} incidents",
        dossier.notes.len(),
        dossier.measures.len(),
        dossier.incidents.len()
    );

    let context = EvidenceContext::new(DEMO_CLIENT, today, dossier.clone())
        .with_form_data(form_data.clone());
    let target = "meerzorg.nachtzorg_toelichting";
    let mut links = link_evidence(&context, target);
    links.truncate(engine.config.max_links);

    println!("\nEvidence for {target}");
    for link in &links {
        println!(
            "  - {} {} | relevance {:.2} | confidence {:.2} | {}",
            link.source_type.label(),
            link.source_id,
            link.relevance,
            link.confidence,
            link.snippet
        );
    }

    let chain = build_evidence_chain(
        target,
        "Cliënt heeft nachtelijk toezicht nodig",
        links,
        &context,
    );
    println!(
        "  Chain confidence {:.2} ({} links)",
        chain.overall_confidence,
        chain.evidence.len()
    );
    for gap in &chain.gaps {
        println!("  Gap: {gap}");
    }

    let config = engine
        .versions
        .resolve_version_config(FrameworkType::Meerzorg, &version);
    let check_context = CheckContext::new(DEMO_CLIENT, today, config)
        .with_form_data(form_data.clone())
        .with_dossier(dossier);
    let results = engine.rules.execute_normative_checks(
        &check_context,
        &FrameworkSelector::new(FrameworkType::Meerzorg, version.clone()),
    );
    let summary = summarize(&results);

    println!("\nNormative checks (Meerzorg {version})");
    for result in &results {
        let marker = match result.status {
            CheckStatus::Pass => "ok  ",
            CheckStatus::Warning => "warn",
            CheckStatus::Fail => "FAIL",
        };
        println!("  [{marker}] {} {}", result.rule_id, result.message);
    }
    println!(
        "- {} passed | {} warnings | {} failed | ready for submission: {}",
        summary.passed, summary.warnings, summary.failed, summary.ready_for_submission
    );

    let report =
        engine
            .versions
            .validate_against_version(&form_data, FrameworkType::Meerzorg, &version, today);
    println!(
        "\nVersion validation: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    for issue in &report.issues {
        println!("  - {:?} {}: {}", issue.severity, issue.field, issue.message);
    }

    let delta = engine
        .versions
        .compare_versions(FrameworkType::Meerzorg, "2025", "2026");
    println!(
        "\nMeerzorg 2025 -> 2026: {} rules added | {} features enabled | {} newly required fields",
        delta.rules_added.len(),
        delta.features_enabled.len(),
        delta.newly_required_fields.len()
    );

    let migration = engine.versions.migrate(
        &Value::Object(form_data),
        "2025",
        "2026",
        FrameworkType::Meerzorg,
        today,
    );
    for warning in &migration.warnings {
        println!("  Migration warning: {warning}");
    }

    let period = EvaluationPeriod::new(today - Duration::days(90), today);
    println!("\nVV8 criteria ({} to {})", period.start, period.end);
    let criteria = engine
        .criteria
        .evaluate_all(DEMO_CLIENT, period, engine.config.max_evidence)
        .await;
    for criterion in &criteria {
        println!(
            "  - {}: {} | confidence {:.2} | {} evidence",
            criterion.label,
            criterion.status.label(),
            criterion.confidence,
            criterion.evidence.len()
        );
    }

    Ok(())
}

fn synthetic_dossier(today: NaiveDate) -> Dossier {
    let days_ago = |days: i64| today - Duration::days(days);

    Dossier {
        notes: vec![
            Note {
                id: "rap-101".to_string(),
                client_id: DEMO_CLIENT.to_string(),
                date: days_ago(3),
                author: "Verpleegkundige De Vries".to_string(),
                section: "Zorgplan".to_string(),
                text: "Cliënt is 's nachts onrustig en dwaalt over de afdeling; toezicht nodig."
                    .to_string(),
            },
            Note {
                id: "rap-102".to_string(),
                client_id: DEMO_CLIENT.to_string(),
                date: days_ago(10),
                author: "Verzorgende IG Smit".to_string(),
                section: "Dagrapportage".to_string(),
                text: "Volledige hulp bij wassen en aankleden, afhankelijk bij toiletgang."
                    .to_string(),
            },
            Note {
                id: "rap-103".to_string(),
                client_id: DEMO_CLIENT.to_string(),
                date: days_ago(40),
                author: "Familie".to_string(),
                section: "Overig".to_string(),
                text: "Bezoek verliep rustig, cliënt herkende dochter.".to_string(),
            },
        ],
        measures: vec![
            Measure {
                id: "katz-7".to_string(),
                client_id: DEMO_CLIENT.to_string(),
                date: days_ago(21),
                measure_type: "Katz-ADL".to_string(),
                score: 5.0,
                comment: Some("Toegenomen afhankelijkheid".to_string()),
            },
            Measure {
                id: "npi-2".to_string(),
                client_id: DEMO_CLIENT.to_string(),
                date: days_ago(30),
                measure_type: "NPI".to_string(),
                score: 18.0,
                comment: None,
            },
        ],
        incidents: vec![Incident {
            id: "inc-55".to_string(),
            client_id: DEMO_CLIENT.to_string(),
            date: days_ago(14),
            incident_type: "Val".to_string(),
            severity: IncidentSeverity::Medium,
            description: "Nachtelijke val naast bed tijdens dwalen".to_string(),
        }],
    }
}

fn synthetic_form(today: NaiveDate) -> FormData {
    let payload = json!({
        "client_naam": "Mevrouw A. Jansen",
        "bsn": "111222333",
        "zorgprofiel": "VV7",
        "aanvraag_toelichting": "Toegenomen zorgbehoefte overdag en 's nachts",
        "dagzorg_uren": 12,
        "nachtzorg_uren": "6",
        "een_op_een_uren": 2,
        "nachtzorg_toelichting": "onrustig en dwaalt 's nachts",
        "gedrag_toelichting": "onrust en agitatie in de avond",
        "laatste_indicatiedatum": (today - Duration::days(120)).format("%Y-%m-%d").to_string(),
    });

    match payload {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}
