use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Dossier, DossierAccessor, DossierError, Incident, Measure, Note};

/// Process-local dossier store for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDossierStore {
    dossiers: Arc<RwLock<HashMap<String, Dossier>>>,
}

impl InMemoryDossierStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dossier(self, client_id: impl Into<String>, dossier: Dossier) -> Self {
        self.insert(client_id, dossier);
        self
    }

    /// Replace the snapshot held for `client_id`.
    pub fn insert(&self, client_id: impl Into<String>, dossier: Dossier) {
        let mut guard = self
            .dossiers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(client_id.into(), dossier);
    }

    pub fn contains(&self, client_id: &str) -> bool {
        let guard = self
            .dossiers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.contains_key(client_id)
    }

    fn snapshot(&self, client_id: &str) -> Dossier {
        let guard = self
            .dossiers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(client_id).cloned().unwrap_or_default()
    }
}

impl DossierAccessor for InMemoryDossierStore {
    fn notes(&self, client_id: &str) -> Result<Vec<Note>, DossierError> {
        Ok(self.snapshot(client_id).notes)
    }

    fn measures(&self, client_id: &str) -> Result<Vec<Measure>, DossierError> {
        Ok(self.snapshot(client_id).measures)
    }

    fn incidents(&self, client_id: &str) -> Result<Vec<Incident>, DossierError> {
        Ok(self.snapshot(client_id).incidents)
    }

    fn dossier(&self, client_id: &str) -> Result<Dossier, DossierError> {
        Ok(self.snapshot(client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_client_yields_empty_dossier() {
        let store = InMemoryDossierStore::new();
        let dossier = store.dossier("nobody").expect("store is infallible");
        assert!(dossier.is_empty());
        assert!(!store.contains("nobody"));
    }
}
