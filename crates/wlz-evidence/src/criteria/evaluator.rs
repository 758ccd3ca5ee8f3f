use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::timeout;
use tracing::{info, warn};

use super::heuristic::{bucket_confidence, determine_status};
use super::{
    AdvisoryContextCache, AdvisoryService, Criterion, CriterionDefinition, CriterionStatus,
};
use crate::config::EngineConfig;
use crate::dossier::{Dossier, DossierAccessor, EvaluationPeriod};
use crate::evidence::{build_evidence_chain, link_keywords, EvidenceContext, EvidenceLink};

/// Resolves criteria for a client. The advisory service is attempted at most once per
/// criterion, bounded by `advisory_timeout`; every other path ends in the heuristic,
/// including a panicking advisory call.
pub struct CriterionEvaluator<D> {
    dossiers: Arc<D>,
    advisory: Option<Arc<dyn AdvisoryService>>,
    cache: Arc<AdvisoryContextCache>,
    advisory_timeout: Duration,
}

impl<D> CriterionEvaluator<D>
where
    D: DossierAccessor + 'static,
{
    pub fn new(dossiers: Arc<D>, config: &EngineConfig) -> Self {
        Self {
            dossiers,
            advisory: None,
            cache: Arc::new(AdvisoryContextCache::new()),
            advisory_timeout: config.advisory_timeout,
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<dyn AdvisoryService>) -> Self {
        self.advisory = Some(advisory);
        self
    }

    pub fn with_cache(mut self, cache: Arc<AdvisoryContextCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<AdvisoryContextCache> {
        &self.cache
    }

    pub async fn evaluate_criterion(
        &self,
        client_id: &str,
        criterion: &CriterionDefinition,
        period: EvaluationPeriod,
        max_evidence: usize,
    ) -> Criterion {
        let dossier = self.load_dossier(client_id);
        let scoped = dossier.within(&period);
        let mut evidence = link_keywords(&scoped, &criterion.keywords, period.end);
        evidence.truncate(max_evidence);

        if evidence.is_empty() {
            info!(client_id, criterion = %criterion.id, "no evidence for criterion");
            return Criterion {
                id: criterion.id.clone(),
                label: criterion.label.clone(),
                status: CriterionStatus::InsufficientEvidence,
                argument: format!(
                    "Geen dossierregels over {} gevonden tussen {} en {}",
                    criterion.label.to_lowercase(),
                    period.start,
                    period.end
                ),
                evidence,
                confidence: 0.0,
                uncertainty: None,
            };
        }

        let gaps = evidence_gaps(client_id, criterion, &evidence, scoped, period);

        let Some(advisory) = &self.advisory else {
            let fallback = self.fallback(criterion, evidence, "geen adviesdienst geconfigureerd");
            return with_gaps(fallback, &gaps);
        };

        let context = self.cache.get_or_init(client_id, &dossier);
        let call = AssertUnwindSafe(advisory.evaluate(criterion, &evidence, &context));
        let outcome = timeout(self.advisory_timeout, call.catch_unwind()).await;

        let resolved = match outcome {
            Ok(Ok(Ok(opinion))) if opinion.is_well_formed() => {
                info!(
                    client_id,
                    criterion = %criterion.id,
                    status = opinion.status.label(),
                    "criterion resolved by advisory opinion"
                );
                Criterion {
                    id: criterion.id.clone(),
                    label: criterion.label.clone(),
                    status: opinion.status,
                    argument: opinion.argument,
                    evidence,
                    confidence: opinion.confidence,
                    uncertainty: opinion.uncertainty,
                }
            }
            Ok(Ok(Ok(opinion))) => {
                warn!(
                    client_id,
                    criterion = %criterion.id,
                    ?opinion,
                    "malformed advisory opinion"
                );
                self.fallback(criterion, evidence, "onbruikbaar advies ontvangen")
            }
            Ok(Ok(Err(error))) => {
                warn!(client_id, criterion = %criterion.id, %error, "advisory call failed");
                self.fallback(criterion, evidence, "adviesdienst gaf een fout")
            }
            Ok(Err(_)) => {
                warn!(client_id, criterion = %criterion.id, "advisory call panicked");
                self.fallback(criterion, evidence, "adviesdienst brak af")
            }
            Err(_) => {
                warn!(
                    client_id,
                    criterion = %criterion.id,
                    timeout_ms = self.advisory_timeout.as_millis() as u64,
                    "advisory call timed out"
                );
                self.fallback(criterion, evidence, "adviesdienst reageerde niet op tijd")
            }
        };

        with_gaps(resolved, &gaps)
    }

    /// All VV8 criteria for one client, evaluated in order.
    pub async fn evaluate_all(
        &self,
        client_id: &str,
        period: EvaluationPeriod,
        max_evidence: usize,
    ) -> Vec<Criterion> {
        let mut criteria = Vec::new();
        for definition in CriterionDefinition::vv8() {
            criteria.push(
                self.evaluate_criterion(client_id, &definition, period, max_evidence)
                    .await,
            );
        }
        criteria
    }

    fn load_dossier(&self, client_id: &str) -> Dossier {
        match self.dossiers.dossier(client_id) {
            Ok(dossier) => dossier,
            Err(error) => {
                warn!(client_id, %error, "dossier unavailable, evaluating without records");
                Dossier::default()
            }
        }
    }

    fn fallback(
        &self,
        criterion: &CriterionDefinition,
        evidence: Vec<EvidenceLink>,
        reason: &str,
    ) -> Criterion {
        let status = determine_status(&evidence);
        let confidence = bucket_confidence(evidence.len());
        info!(
            criterion = %criterion.id,
            status = status.label(),
            evidence = evidence.len(),
            "criterion resolved by heuristic"
        );

        Criterion {
            id: criterion.id.clone(),
            label: criterion.label.clone(),
            status,
            argument: format!(
                "Trefwoordanalyse van {} dossierregel(s): {}",
                evidence.len(),
                status.label()
            ),
            evidence,
            confidence,
            uncertainty: Some(format!(
                "Heuristische beoordeling; {reason}. \
                 Laat een zorgprofessional dit criterium controleren."
            )),
        }
    }
}

/// Gap analysis of the attached evidence, read against the period slice of the dossier.
fn evidence_gaps(
    client_id: &str,
    criterion: &CriterionDefinition,
    evidence: &[EvidenceLink],
    scoped: Dossier,
    period: EvaluationPeriod,
) -> Vec<String> {
    let context = EvidenceContext::new(client_id, period.end, scoped);
    build_evidence_chain(&criterion.id, &criterion.label, evidence.to_vec(), &context).gaps
}

fn with_gaps(mut criterion: Criterion, gaps: &[String]) -> Criterion {
    if gaps.is_empty() {
        return criterion;
    }

    let gaps = format!("Bewijslacunes: {}.", gaps.join("; "));
    criterion.uncertainty = Some(match criterion.uncertainty.take() {
        Some(note) => format!("{note} {gaps}"),
        None => gaps,
    });
    criterion
}
