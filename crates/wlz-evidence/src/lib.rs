//! Evidence linking and normative validation for WLZ care claims.
//!
//! The crate links dossier records (notes, measures, incidents) to form fields and
//! assessment criteria, scores them, assembles gap-annotated evidence chains, runs the
//! versioned compliance rule sets, and resolves criteria through an optional advisory
//! service with a deterministic heuristic fallback.

pub mod config;
pub mod criteria;
pub mod dossier;
pub mod error;
pub mod evidence;
pub mod form;
pub mod rules;
pub mod telemetry;
pub mod versions;

pub use criteria::{
    AdvisoryContextCache, AdvisoryError, AdvisoryOpinion, AdvisoryService, Criterion,
    CriterionDefinition, CriterionEvaluator, CriterionStatus,
};
pub use dossier::{
    Dossier, DossierAccessor, DossierError, DossierRecord, EvaluationPeriod,
    InMemoryDossierStore, Incident, IncidentSeverity, Measure, Note, SourceType,
};
pub use evidence::{
    build_evidence_chain, link_evidence, link_keywords, EvidenceChain, EvidenceContext,
    EvidenceLink,
};
pub use form::FormData;
pub use rules::{
    summarize, CheckCategory, CheckContext, CheckResult, CheckRule, CheckStatus, CheckSummary,
    FrameworkSelector, NormativeRuleEngine, RuleRegistry, Severity,
};
pub use versions::{
    FrameworkType, FrameworkVersion, FrameworkVersionStore, IssueSeverity, MigrationResult,
    ValidationIssue, ValidationReport, VersionCatalog, VersionCatalogError, VersionConfig,
    VersionDelta, VersionLimits, VersionManager,
};
