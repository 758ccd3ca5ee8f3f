use crate::infra::{deserialize_date, deserialize_optional_date, AppState, EngineState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use wlz_evidence::error::AppError;
use wlz_evidence::{
    build_evidence_chain, link_evidence, summarize, CheckContext, CheckResult, CheckSummary,
    Criterion, CriterionDefinition, Dossier, DossierAccessor, EvaluationPeriod, EvidenceChain,
    EvidenceContext, EvidenceLink, FormData, FrameworkSelector, FrameworkType, FrameworkVersion,
    MigrationResult, ValidationReport, VersionConfig, VersionDelta,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LinkRequest {
    pub(crate) client_id: String,
    pub(crate) target_path: String,
    #[serde(default)]
    pub(crate) form_data: FormData,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkResponse {
    pub(crate) client_id: String,
    pub(crate) target_path: String,
    pub(crate) links: Vec<EvidenceLink>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChainRequest {
    pub(crate) client_id: String,
    pub(crate) target: String,
    pub(crate) claim: String,
    #[serde(default)]
    pub(crate) form_data: FormData,
    /// Previously returned links; when absent the target is linked afresh.
    #[serde(default)]
    pub(crate) links: Option<Vec<EvidenceLink>>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChecksRequest {
    pub(crate) client_id: String,
    pub(crate) framework_type: FrameworkType,
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) form_data: FormData,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChecksResponse {
    pub(crate) results: Vec<CheckResult>,
    pub(crate) summary: CheckSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeltaQuery {
    pub(crate) from: String,
    pub(crate) to: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    #[serde(default)]
    pub(crate) form_data: FormData,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MigrateRequest {
    pub(crate) form_data: Value,
    pub(crate) from: String,
    pub(crate) to: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CriterionRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) period_start: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) period_end: NaiveDate,
    #[serde(default)]
    pub(crate) max_evidence: Option<usize>,
}

/// Engine endpoints.
pub(crate) fn engine_router(engine: Arc<EngineState>) -> Router {
    Router::new()
        .route("/api/v1/clients/:client_id/dossier", put(put_dossier))
        .route("/api/v1/evidence/link", post(link_endpoint))
        .route("/api/v1/evidence/chain", post(chain_endpoint))
        .route("/api/v1/checks", post(checks_endpoint))
        .route(
            "/api/v1/frameworks/:framework_type/:version/config",
            get(version_config_endpoint),
        )
        .route(
            "/api/v1/frameworks/:framework_type/:version/validate",
            post(validate_endpoint),
        )
        .route(
            "/api/v1/frameworks/:framework_type/active",
            get(active_version_endpoint),
        )
        .route("/api/v1/frameworks/:framework_type/delta", get(delta_endpoint))
        .route(
            "/api/v1/frameworks/:framework_type/migrate",
            post(migrate_endpoint),
        )
        .route(
            "/api/v1/clients/:client_id/criteria/:criterion_id/evaluate",
            post(criterion_endpoint),
        )
        .with_state(engine)
}

pub(crate) fn with_engine_routes(engine: Arc<EngineState>) -> Router {
    engine_router(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn dossier_for(engine: &EngineState, client_id: &str) -> Result<Dossier, AppError> {
    Ok(engine.dossiers.dossier(client_id)?)
}

pub(crate) async fn put_dossier(
    State(engine): State<Arc<EngineState>>,
    Path(client_id): Path<String>,
    Json(dossier): Json<Dossier>,
) -> Json<Value> {
    let records = dossier.len();
    engine.dossiers.insert(client_id.clone(), dossier);
    engine.advisory_cache.invalidate(&client_id);
    info!(%client_id, records, "dossier snapshot registered");

    Json(json!({ "client_id": client_id, "records": records }))
}

pub(crate) async fn link_endpoint(
    State(engine): State<Arc<EngineState>>,
    Json(request): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let dossier = dossier_for(&engine, &request.client_id)?;
    let context = EvidenceContext::new(
        request.client_id.clone(),
        request.as_of.unwrap_or_else(today),
        dossier,
    )
    .with_form_data(request.form_data);

    let mut links = link_evidence(&context, &request.target_path);
    links.truncate(engine.config.max_links);

    Ok(Json(LinkResponse {
        client_id: request.client_id,
        target_path: request.target_path,
        links,
    }))
}

pub(crate) async fn chain_endpoint(
    State(engine): State<Arc<EngineState>>,
    Json(request): Json<ChainRequest>,
) -> Result<Json<EvidenceChain>, AppError> {
    let dossier = dossier_for(&engine, &request.client_id)?;
    let context = EvidenceContext::new(
        request.client_id,
        request.as_of.unwrap_or_else(today),
        dossier,
    )
    .with_form_data(request.form_data);

    let links = match request.links {
        Some(links) => links,
        None => {
            let mut links = link_evidence(&context, &request.target);
            links.truncate(engine.config.max_links);
            links
        }
    };

    Ok(Json(build_evidence_chain(
        &request.target,
        &request.claim,
        links,
        &context,
    )))
}

pub(crate) async fn checks_endpoint(
    State(engine): State<Arc<EngineState>>,
    Json(request): Json<ChecksRequest>,
) -> Result<Json<ChecksResponse>, AppError> {
    let dossier = dossier_for(&engine, &request.client_id)?;
    let config = engine
        .versions
        .resolve_version_config(request.framework_type, &request.version);
    let context = CheckContext::new(
        request.client_id,
        request.as_of.unwrap_or_else(today),
        config,
    )
    .with_form_data(request.form_data)
    .with_dossier(dossier);

    let results = engine.rules.execute_normative_checks(
        &context,
        &FrameworkSelector::new(request.framework_type, request.version),
    );
    let summary = summarize(&results);

    Ok(Json(ChecksResponse { results, summary }))
}

pub(crate) async fn version_config_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path((framework_type, version)): Path<(FrameworkType, String)>,
) -> Json<VersionConfig> {
    Json(engine.versions.resolve_version_config(framework_type, &version))
}

pub(crate) async fn active_version_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path(framework_type): Path<FrameworkType>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<FrameworkVersion>, AppError> {
    let date = query.date.unwrap_or_else(today);
    engine
        .versions
        .active_version(framework_type, date)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no {framework_type} version active on {date}")))
}

pub(crate) async fn delta_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path(framework_type): Path<FrameworkType>,
    Query(query): Query<DeltaQuery>,
) -> Json<VersionDelta> {
    Json(
        engine
            .versions
            .compare_versions(framework_type, &query.from, &query.to),
    )
}

pub(crate) async fn validate_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path((framework_type, version)): Path<(FrameworkType, String)>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidationReport> {
    Json(engine.versions.validate_against_version(
        &request.form_data,
        framework_type,
        &version,
        request.as_of.unwrap_or_else(today),
    ))
}

pub(crate) async fn migrate_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path(framework_type): Path<FrameworkType>,
    Json(request): Json<MigrateRequest>,
) -> Json<MigrationResult> {
    Json(engine.versions.migrate(
        &request.form_data,
        &request.from,
        &request.to,
        framework_type,
        request.as_of.unwrap_or_else(today),
    ))
}

pub(crate) async fn criterion_endpoint(
    State(engine): State<Arc<EngineState>>,
    Path((client_id, criterion_id)): Path<(String, String)>,
    Json(request): Json<CriterionRequest>,
) -> Result<Json<Criterion>, AppError> {
    let definition = CriterionDefinition::find(&criterion_id)
        .ok_or_else(|| AppError::NotFound(format!("criterion '{criterion_id}'")))?;
    if request.period_end < request.period_start {
        return Err(AppError::InvalidRequest(
            "period_end must not precede period_start".to_string(),
        ));
    }

    let period = EvaluationPeriod::new(request.period_start, request.period_end);
    let max_evidence = request.max_evidence.unwrap_or(engine.config.max_evidence);
    let criterion = engine
        .criteria
        .evaluate_criterion(&client_id, &definition, period, max_evidence)
        .await;

    Ok(Json(criterion))
}
