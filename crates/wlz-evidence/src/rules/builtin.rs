//! Built-in rule catalog for the Meerzorg and Herindicatie frameworks.

use chrono::Duration;

use super::{
    CheckCategory, CheckContext, CheckRule, RuleError, RuleOutcome, RulePredicate, Severity,
};
use crate::evidence::confidence::age_in_days;
use crate::form::{self, FormData};
use crate::versions::{
    FrameworkType, FEATURE_ONE_ON_ONE_CARE, FEATURE_SUSTAINABILITY_REQUIRED,
};

pub const REQ_CLIENT_NAME: &str = "REQ-CLIENT-NAAM";
pub const REQ_BSN: &str = "REQ-BSN";
pub const REQ_CARE_PROFILE: &str = "REQ-ZORGPROFIEL";
pub const REQ_REQUEST_ARGUMENT: &str = "REQ-AANVRAAG-TOELICHTING";
pub const REQ_REASSESSMENT_REASON: &str = "REQ-REDEN-HERINDICATIE";
pub const TK_DAY_CARE_LIMIT: &str = "TK-DAGZORG-MAX";
pub const TK_NIGHT_CARE_LIMIT: &str = "TK-NACHTZORG-MAX";
pub const TK_ONE_ON_ONE_LIMIT: &str = "TK-EEN-OP-EEN-MAX";
pub const TK_SUSTAINABILITY: &str = "TK-DUURZAAMHEID";
pub const TK_CARE_PROFILE_FORMAT: &str = "TK-PROFIEL-VV";
pub const CMP_RECENT_REPORTING: &str = "CMP-RECENTE-RAPPORTAGE";
pub const CMP_ADL_MEASURE: &str = "CMP-ADL-MEETING";
pub const CMP_BEHAVIOUR_MEASURE: &str = "CMP-GEDRAG-MEETING";
pub const CMP_ONE_ON_ONE_INCIDENTS: &str = "CMP-EEN-OP-EEN-INCIDENTEN";
pub const CON_NIGHT_CARE_EVIDENCE: &str = "CON-NACHTZORG-BEWIJS";
pub const CON_BSN_CHECKSUM: &str = "CON-BSN-ELFPROEF";

const MEERZORG_2025: &[&str] = &[
    REQ_CLIENT_NAME,
    REQ_BSN,
    REQ_CARE_PROFILE,
    REQ_REQUEST_ARGUMENT,
    TK_DAY_CARE_LIMIT,
    TK_NIGHT_CARE_LIMIT,
    TK_ONE_ON_ONE_LIMIT,
    CMP_RECENT_REPORTING,
    CMP_ADL_MEASURE,
    CMP_ONE_ON_ONE_INCIDENTS,
    CON_NIGHT_CARE_EVIDENCE,
    CON_BSN_CHECKSUM,
];

const MEERZORG_2026: &[&str] = &[
    REQ_CLIENT_NAME,
    REQ_BSN,
    REQ_CARE_PROFILE,
    REQ_REQUEST_ARGUMENT,
    TK_DAY_CARE_LIMIT,
    TK_NIGHT_CARE_LIMIT,
    TK_ONE_ON_ONE_LIMIT,
    TK_SUSTAINABILITY,
    CMP_RECENT_REPORTING,
    CMP_ADL_MEASURE,
    CMP_BEHAVIOUR_MEASURE,
    CMP_ONE_ON_ONE_INCIDENTS,
    CON_NIGHT_CARE_EVIDENCE,
    CON_BSN_CHECKSUM,
];

const HERINDICATIE_2025: &[&str] = &[
    REQ_CLIENT_NAME,
    REQ_BSN,
    REQ_CARE_PROFILE,
    REQ_REASSESSMENT_REASON,
    TK_CARE_PROFILE_FORMAT,
    CMP_RECENT_REPORTING,
    CMP_ADL_MEASURE,
    CON_BSN_CHECKSUM,
];

const HERINDICATIE_2026: &[&str] = &[
    REQ_CLIENT_NAME,
    REQ_BSN,
    REQ_CARE_PROFILE,
    REQ_REASSESSMENT_REASON,
    TK_CARE_PROFILE_FORMAT,
    CMP_RECENT_REPORTING,
    CMP_ADL_MEASURE,
    CMP_BEHAVIOUR_MEASURE,
    CON_BSN_CHECKSUM,
];

/// Rule ids per framework version, in evaluation order.
pub const RULE_SETS: &[(FrameworkType, &str, &[&str])] = &[
    (FrameworkType::Meerzorg, "2025", MEERZORG_2025),
    (FrameworkType::Meerzorg, "2026", MEERZORG_2026),
    (FrameworkType::Herindicatie, "2025", HERINDICATIE_2025),
    (FrameworkType::Herindicatie, "2026", HERINDICATIE_2026),
];

pub fn rule_set(framework_type: FrameworkType, version: &str) -> &'static [&'static str] {
    RULE_SETS
        .iter()
        .find(|(kind, label, _)| *kind == framework_type && *label == version)
        .map(|(_, _, ids)| *ids)
        .unwrap_or(&[])
}

const RECENT_REPORTING_DAYS: i64 = 90;
const INCIDENT_WINDOW_DAYS: i64 = 180;
const ADL_INSTRUMENTS: &[&str] = &["katz", "adl", "barthel"];
const BEHAVIOUR_INSTRUMENTS: &[&str] = &["npi", "cmai"];

pub(crate) fn definitions() -> Vec<(CheckRule, RulePredicate)> {
    use CheckCategory::*;

    vec![
        (
            CheckRule::new(
                REQ_CLIENT_NAME,
                "Naam cliënt ingevuld",
                RequiredField,
                Severity::Critical,
            )
            .with_description("Het formulier vermeldt de naam van de cliënt."),
            client_name_present as RulePredicate,
        ),
        (
            CheckRule::new(REQ_BSN, "BSN ingevuld", RequiredField, Severity::Critical),
            bsn_present,
        ),
        (
            CheckRule::new(REQ_CARE_PROFILE, "Zorgprofiel ingevuld", RequiredField, Severity::High),
            care_profile_present,
        ),
        (
            CheckRule::new(
                REQ_REQUEST_ARGUMENT,
                "Toelichting aanvraag ingevuld",
                RequiredField,
                Severity::High,
            ),
            request_argument_present,
        ),
        (
            CheckRule::new(
                REQ_REASSESSMENT_REASON,
                "Reden herindicatie ingevuld",
                RequiredField,
                Severity::High,
            ),
            reassessment_reason_present,
        ),
        (
            CheckRule::new(
                TK_DAY_CARE_LIMIT,
                "Dagzorguren binnen maximum",
                ToetsingskaderRule,
                Severity::Critical,
            )
            .with_description("Aangevraagde dagzorguren overschrijden het versiemaximum niet."),
            day_care_within_limit,
        ),
        (
            CheckRule::new(
                TK_NIGHT_CARE_LIMIT,
                "Nachtzorguren binnen maximum",
                ToetsingskaderRule,
                Severity::Critical,
            ),
            night_care_within_limit,
        ),
        (
            CheckRule::new(
                TK_ONE_ON_ONE_LIMIT,
                "Een-op-een-uren toegestaan en binnen maximum",
                ToetsingskaderRule,
                Severity::High,
            ),
            one_on_one_within_limit,
        ),
        (
            CheckRule::new(
                TK_SUSTAINABILITY,
                "Duurzaamheid onderbouwd",
                ToetsingskaderRule,
                Severity::High,
            ),
            sustainability_argued,
        ),
        (
            CheckRule::new(
                TK_CARE_PROFILE_FORMAT,
                "Zorgprofiel is een geldig VV-profiel",
                ToetsingskaderRule,
                Severity::Medium,
            ),
            care_profile_is_vv,
        ),
        (
            CheckRule::new(
                CMP_RECENT_REPORTING,
                "Recente rapportage aanwezig",
                Completeness,
                Severity::Medium,
            ),
            recent_reporting_present,
        ),
        (
            CheckRule::new(
                CMP_ADL_MEASURE,
                "Gestandaardiseerde ADL-meting actueel",
                Completeness,
                Severity::High,
            ),
            adl_measure_current,
        ),
        (
            CheckRule::new(
                CMP_BEHAVIOUR_MEASURE,
                "Gedragsmeting bij gedragsproblematiek",
                Completeness,
                Severity::Medium,
            ),
            behaviour_measure_current,
        ),
        (
            CheckRule::new(
                CMP_ONE_ON_ONE_INCIDENTS,
                "Incidenten onderbouwen een-op-een-zorg",
                Completeness,
                Severity::Medium,
            ),
            one_on_one_backed_by_incidents,
        ),
        (
            CheckRule::new(
                CON_NIGHT_CARE_EVIDENCE,
                "Nachtzorg onderbouwd in dossier",
                Consistency,
                Severity::Medium,
            ),
            night_care_backed_by_dossier,
        ),
        (
            CheckRule::new(
                CON_BSN_CHECKSUM,
                "BSN voldoet aan elfproef",
                Consistency,
                Severity::High,
            ),
            bsn_passes_checksum,
        ),
    ]
}

fn required(form: &FormData, field: &str, label: &str) -> Result<RuleOutcome, RuleError> {
    if form::is_filled(form, field) {
        Ok(RuleOutcome::pass(format!("{label} is ingevuld")))
    } else {
        Ok(RuleOutcome::fail(format!(
            "Verplicht veld '{field}' ({label}) ontbreekt"
        )))
    }
}

fn client_name_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    required(&ctx.form_data, form::CLIENT_NAME, "naam cliënt")
}

fn bsn_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    required(&ctx.form_data, form::BSN, "burgerservicenummer")
}

fn care_profile_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    required(&ctx.form_data, form::CARE_PROFILE, "zorgprofiel")
}

fn request_argument_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    required(&ctx.form_data, form::REQUEST_ARGUMENT, "toelichting aanvraag")
}

fn reassessment_reason_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    required(&ctx.form_data, form::REASSESSMENT_REASON, "reden herindicatie")
}

fn within_limit(
    form: &FormData,
    field: &str,
    limit: f64,
    version: &str,
) -> Result<RuleOutcome, RuleError> {
    match form::hours(form, field)? {
        None => Ok(RuleOutcome::pass(format!("Geen uren aangevraagd in '{field}'"))),
        Some(hours) if hours > limit => Ok(RuleOutcome::fail(format!(
            "{hours} uur in '{field}' overschrijdt het maximum van {limit} uur (versie {version})"
        ))),
        Some(hours) => Ok(RuleOutcome::pass(format!(
            "{hours} uur in '{field}' valt binnen het maximum van {limit} uur"
        ))),
    }
}

fn day_care_within_limit(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    within_limit(
        &ctx.form_data,
        form::DAY_CARE_HOURS,
        ctx.config.limits.max_day_care_hours,
        &ctx.config.version,
    )
}

fn night_care_within_limit(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    within_limit(
        &ctx.form_data,
        form::NIGHT_CARE_HOURS,
        ctx.config.limits.max_night_care_hours,
        &ctx.config.version,
    )
}

fn one_on_one_within_limit(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let requested = form::hours(&ctx.form_data, form::ONE_ON_ONE_HOURS)?.unwrap_or(0.0);
    if requested > 0.0 && !ctx.config.feature(FEATURE_ONE_ON_ONE_CARE) {
        return Ok(RuleOutcome::fail(format!(
            "Een-op-een-zorg is niet toegestaan binnen {} versie {}",
            ctx.config.framework_type.label(),
            ctx.config.version
        )));
    }
    within_limit(
        &ctx.form_data,
        form::ONE_ON_ONE_HOURS,
        ctx.config.limits.max_one_on_one_hours,
        &ctx.config.version,
    )
}

fn sustainability_argued(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    if !ctx.config.feature(FEATURE_SUSTAINABILITY_REQUIRED) {
        return Ok(RuleOutcome::pass(
            "Duurzaamheidsonderbouwing niet vereist in deze versie",
        ));
    }
    required(
        &ctx.form_data,
        form::SUSTAINABILITY_ARGUMENT,
        "duurzaamheidsonderbouwing",
    )
}

fn care_profile_is_vv(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let Some(profile) = form::text(&ctx.form_data, form::CARE_PROFILE) else {
        return Ok(RuleOutcome::warning(
            "Zorgprofiel ontbreekt; profielcontrole overgeslagen",
        ));
    };

    if is_vv_profile(profile) {
        Ok(RuleOutcome::pass(format!("{profile} is een geldig VV-profiel")))
    } else {
        Ok(RuleOutcome::fail(format!(
            "'{profile}' is geen geldig VV-profiel (VV1 t/m VV10)"
        )))
    }
}

fn is_vv_profile(profile: &str) -> bool {
    let normalized: String = profile
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    normalized
        .strip_prefix("VV")
        .and_then(|number| number.parse::<u8>().ok())
        .is_some_and(|number| (1..=10).contains(&number))
}

fn recent_reporting_present(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let recent = ctx
        .dossier
        .notes
        .iter()
        .filter(|note| age_in_days(note.date, ctx.as_of) <= RECENT_REPORTING_DAYS)
        .count();
    if recent > 0 {
        Ok(RuleOutcome::pass(format!(
            "{recent} rapportage(s) in de afgelopen {RECENT_REPORTING_DAYS} dagen"
        )))
    } else {
        Ok(RuleOutcome::warning(format!(
            "Geen rapportage in de afgelopen {RECENT_REPORTING_DAYS} dagen"
        )))
    }
}

fn latest_instrument_age(ctx: &CheckContext, instruments: &[&str]) -> Option<i64> {
    ctx.dossier
        .measures
        .iter()
        .filter(|measure| {
            let kind = measure.measure_type.to_lowercase();
            instruments.iter().any(|instrument| kind.contains(instrument))
        })
        .map(|measure| age_in_days(measure.date, ctx.as_of))
        .min()
}

fn adl_measure_current(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let window = ctx.config.limits.min_assessment_recency_days;
    match latest_instrument_age(ctx, ADL_INSTRUMENTS) {
        None => Ok(RuleOutcome::fail(
            "Geen gestandaardiseerde ADL-meting (Katz/Barthel) in het dossier",
        )),
        Some(age) if age > window => Ok(RuleOutcome::warning(format!(
            "Laatste ADL-meting is {age} dagen oud; maximaal {window} dagen toegestaan"
        ))),
        Some(age) => Ok(RuleOutcome::pass(format!("ADL-meting van {age} dagen geleden"))),
    }
}

fn behaviour_measure_current(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    if !form::is_filled(&ctx.form_data, form::BEHAVIOUR_ARGUMENT) {
        return Ok(RuleOutcome::pass("Geen gedragsproblematiek opgevoerd"));
    }
    let window = ctx.config.limits.min_assessment_recency_days;
    match latest_instrument_age(ctx, BEHAVIOUR_INSTRUMENTS) {
        None => Ok(RuleOutcome::fail(
            "Gedragsproblematiek opgevoerd zonder NPI- of CMAI-meting",
        )),
        Some(age) if age > window => Ok(RuleOutcome::warning(format!(
            "Laatste gedragsmeting is {age} dagen oud; maximaal {window} dagen toegestaan"
        ))),
        Some(age) => Ok(RuleOutcome::pass(format!(
            "Gedragsmeting van {age} dagen geleden"
        ))),
    }
}

fn one_on_one_backed_by_incidents(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let requested = form::hours(&ctx.form_data, form::ONE_ON_ONE_HOURS)?.unwrap_or(0.0);
    if requested <= 0.0 {
        return Ok(RuleOutcome::pass("Geen een-op-een-zorg aangevraagd"));
    }
    let since = ctx.as_of - Duration::days(INCIDENT_WINDOW_DAYS);
    let incidents = ctx
        .dossier
        .incidents
        .iter()
        .filter(|incident| incident.date >= since)
        .count();
    if incidents > 0 {
        Ok(RuleOutcome::pass(format!(
            "{incidents} incident(en) in de afgelopen {INCIDENT_WINDOW_DAYS} dagen"
        )))
    } else {
        Ok(RuleOutcome::warning(format!(
            "Een-op-een-zorg aangevraagd zonder incidenten in de afgelopen \
             {INCIDENT_WINDOW_DAYS} dagen"
        )))
    }
}

fn night_care_backed_by_dossier(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let requested = form::hours(&ctx.form_data, form::NIGHT_CARE_HOURS)?.unwrap_or(0.0);
    if requested <= 0.0 {
        return Ok(RuleOutcome::pass("Geen nachtzorg aangevraagd"));
    }
    let backed = ctx
        .dossier
        .records()
        .any(|record| record.text().to_lowercase().contains("nacht"));
    if backed {
        Ok(RuleOutcome::pass("Nachtelijke zorgvraag is terug te vinden in het dossier"))
    } else {
        Ok(RuleOutcome::fail(
            "Nachtzorg aangevraagd maar het dossier bevat geen nachtelijke rapportage \
             of incidenten",
        ))
    }
}

fn bsn_passes_checksum(ctx: &CheckContext) -> Result<RuleOutcome, RuleError> {
    let raw = match ctx.form_data.get(form::BSN) {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(serde_json::Value::Number(number)) => number.to_string(),
        _ => return Ok(RuleOutcome::pass("Geen BSN opgegeven; elfproef overgeslagen")),
    };
    if is_valid_bsn(&raw) {
        Ok(RuleOutcome::pass("BSN voldoet aan de elfproef"))
    } else {
        Ok(RuleOutcome::fail(format!("BSN '{raw}' voldoet niet aan de elfproef")))
    }
}

/// Dutch citizen service number check: weights 9..2 and -1, sum divisible by 11.
pub fn is_valid_bsn(raw: &str) -> bool {
    let digits: Vec<i64> = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .map(|c| c.to_digit(10).map(i64::from))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();
    let digits = match digits.len() {
        9 => digits,
        8 => std::iter::once(0).chain(digits).collect(),
        _ => return false,
    };
    let sum: i64 = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| {
            let weight = if index == 8 { -1 } else { 9 - index as i64 };
            weight * digit
        })
        .sum();
    sum != 0 && sum % 11 == 0
}
