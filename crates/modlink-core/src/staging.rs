//! Pass-scoped staging of loaded modules.

use std::collections::{BTreeMap, HashSet};

use crate::descriptor::{ModuleArtifact, ModuleDescriptor};
use crate::findings::{Finding, Findings};
use crate::ledger::ImportFindingKey;
use crate::location::ModuleLocation;

/// Modules loaded during one resolution pass, waiting for assembly.
///
/// A staging area lives for exactly one `load_*` call. Every location is
/// visited at most once, whether it ends up staged or rejected.
#[derive(Debug, Default)]
pub struct StagingArea {
    libraries: BTreeMap<ModuleLocation, ModuleDescriptor>,
    schemas: BTreeMap<ModuleLocation, ModuleDescriptor>,
    visited: HashSet<ModuleLocation>,
    findings: Findings,
    unresolved: Vec<(ImportFindingKey, Finding)>,
}

impl StagingArea {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `location` was already seen in this pass.
    #[must_use]
    pub fn is_visited(&self, location: &ModuleLocation) -> bool {
        self.visited.contains(location)
    }

    /// Mark `location` as seen. Returns `false` if it already was.
    pub fn mark_visited(&mut self, location: &ModuleLocation) -> bool {
        self.visited.insert(location.clone())
    }

    /// Stage a descriptor in the map matching its artifact.
    pub fn stage(&mut self, location: ModuleLocation, descriptor: ModuleDescriptor) {
        self.visited.insert(location.clone());
        match descriptor.artifact {
            ModuleArtifact::Library(_) => {
                self.libraries.insert(location, descriptor);
            }
            ModuleArtifact::Schema(_) => {
                self.schemas.insert(location, descriptor);
            }
        }
    }

    #[must_use]
    pub fn is_staged(&self, location: &ModuleLocation) -> bool {
        self.libraries.contains_key(location) || self.schemas.contains_key(location)
    }

    #[must_use]
    pub fn get(&self, location: &ModuleLocation) -> Option<&ModuleDescriptor> {
        self.libraries
            .get(location)
            .or_else(|| self.schemas.get(location))
    }

    /// Whether a staged module lives in `namespace`.
    #[must_use]
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.libraries
            .values()
            .chain(self.schemas.values())
            .any(|d| d.namespace() == Some(namespace))
    }

    pub fn libraries(&self) -> impl Iterator<Item = (&ModuleLocation, &ModuleDescriptor)> {
        self.libraries.iter()
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&ModuleLocation, &ModuleDescriptor)> {
        self.schemas.iter()
    }

    /// Number of staged modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len() + self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.schemas.is_empty()
    }

    /// Record a structural finding for this pass.
    pub fn record(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Record findings returned by a collaborator.
    pub fn record_all(&mut self, findings: Findings) {
        self.findings.extend(findings);
    }

    /// Record a speculative "could not find" finding.
    pub fn record_unresolved(&mut self, key: ImportFindingKey, finding: Finding) {
        self.unresolved.push((key, finding));
    }

    #[must_use]
    pub fn findings(&self) -> &Findings {
        &self.findings
    }

    /// Take the pass findings out, leaving the staged modules.
    pub fn take_findings(&mut self) -> (Findings, Vec<(ImportFindingKey, Finding)>) {
        (
            std::mem::take(&mut self.findings),
            std::mem::take(&mut self.unresolved),
        )
    }

    /// Consume the staging area: libraries first, then schemas, each in
    /// location order.
    pub fn into_descriptors(self) -> impl Iterator<Item = (ModuleLocation, ModuleDescriptor)> {
        self.libraries.into_iter().chain(self.schemas)
    }
}
