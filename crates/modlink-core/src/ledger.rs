//! Cross-pass findings store.
//!
//! Structural findings are permanent. "Could not find namespace X" findings
//! are speculative: they are replaced when recorded again and disappear as
//! soon as the model contains X, or a namespace the importer's version
//! scheme accepts in its place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::ParsingContext;
use crate::findings::{Finding, Findings};
use crate::model::ResolvedModel;

/// Key of an unresolved-import finding: who imported what.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImportFindingKey {
    /// Identity of the importing module.
    pub source: String,
    /// Namespace that could not be resolved.
    pub namespace: String,
    /// Version scheme the importer compares namespaces with.
    pub scheme: String,
}

impl ImportFindingKey {
    pub fn new(
        source: impl Into<String>,
        namespace: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            namespace: namespace.into(),
            scheme: scheme.into(),
        }
    }

    /// Whether `model` now supplies this namespace.
    #[must_use]
    pub fn is_satisfied(&self, model: &ResolvedModel, context: &ParsingContext) -> bool {
        model.satisfies(&self.namespace, context.scheme_for(Some(&self.scheme)))
    }
}

/// Findings accumulated over every pass of one engine.
#[derive(Debug, Clone, Default)]
pub struct FindingsLedger {
    general: Findings,
    import_findings: BTreeMap<ImportFindingKey, Finding>,
}

impl FindingsLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a permanent finding.
    pub fn record(&mut self, finding: Finding) {
        self.general.push(finding);
    }

    /// Record several permanent findings.
    pub fn record_all(&mut self, findings: Findings) {
        self.general.extend(findings);
    }

    /// Record or replace an unresolved-import finding.
    pub fn record_import(&mut self, key: ImportFindingKey, finding: Finding) {
        self.import_findings.insert(key, finding);
    }

    /// Drop import findings whose namespace `model` now supplies.
    ///
    /// Returns the number of entries dropped.
    pub fn prune(&mut self, model: &ResolvedModel, context: &ParsingContext) -> usize {
        let before = self.import_findings.len();
        self.import_findings
            .retain(|key, _| !key.is_satisfied(model, context));
        before - self.import_findings.len()
    }

    /// Current findings against `model`, stale import findings excluded.
    #[must_use]
    pub fn current(&self, model: &ResolvedModel, context: &ParsingContext) -> Findings {
        let mut findings = self.general.clone();
        findings.extend(
            self.import_findings
                .iter()
                .filter(|(key, _)| !key.is_satisfied(model, context))
                .map(|(_, finding)| finding.clone()),
        );
        findings
    }

    /// Number of stored findings, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.general.len() + self.import_findings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.import_findings.is_empty()
    }
}
