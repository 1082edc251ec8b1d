//! Depth-first descent over includes, imports and version predecessors.

use tracing::debug;
use url::Url;

use crate::config::EngineConfig;
use crate::context::ParsingContext;
use crate::contracts::{LoadError, LoadOutcome, ModuleLoader, NamespaceResolver};
use crate::crc::{self, CrcCheck};
use crate::descriptor::{ModuleDescriptor, ModuleKind, NamespaceImport};
use crate::findings::{Finding, FindingCode};
use crate::ledger::ImportFindingKey;
use crate::location::ModuleLocation;
use crate::model::ResolvedModel;
use crate::scheme::VersionScheme;
use crate::staging::StagingArea;

/// How a module was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// Requested by the caller; no identity check.
    Root,
    /// Same-namespace include.
    Include,
    /// Cross-namespace import, declared or synthesized by backfill.
    Import,
}

/// An edge into a module, with the namespace it must report.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge<'e> {
    pub kind: EdgeKind,
    pub expected: Option<&'e str>,
}

impl<'e> Edge<'e> {
    pub fn root() -> Self {
        Self {
            kind: EdgeKind::Root,
            expected: None,
        }
    }

    pub fn include(host_namespace: Option<&'e str>) -> Self {
        Self {
            kind: EdgeKind::Include,
            expected: host_namespace,
        }
    }

    pub fn import(namespace: &'e str) -> Self {
        Self {
            kind: EdgeKind::Import,
            expected: Some(namespace),
        }
    }
}

/// State of one resolution pass.
///
/// Borrows the collaborators and the model read-only; the staging area is
/// the only thing a descent writes to.
pub(crate) struct Descent<'a> {
    pub(super) context: &'a ParsingContext,
    pub(super) config: &'a EngineConfig,
    loader: &'a dyn ModuleLoader,
    pub(super) resolver: &'a dyn NamespaceResolver,
    pub(super) model: &'a ResolvedModel,
    pub(super) staging: &'a mut StagingArea,
}

impl<'a> Descent<'a> {
    pub fn new(
        context: &'a ParsingContext,
        config: &'a EngineConfig,
        loader: &'a dyn ModuleLoader,
        resolver: &'a dyn NamespaceResolver,
        model: &'a ResolvedModel,
        staging: &'a mut StagingArea,
    ) -> Self {
        Self {
            context,
            config,
            loader,
            resolver,
            model,
            staging,
        }
    }

    /// Load the caller's root. Failing to read it is returned, not recorded.
    pub fn visit_root(&mut self, location: &ModuleLocation) -> Result<(), LoadError> {
        if self.is_known(location) {
            debug!(location = %location, "Root already resolved");
            return Ok(());
        }
        self.staging.mark_visited(location);
        let outcome = self.fetch(location)?;
        self.process(location, outcome, Edge::root(), 0);
        Ok(())
    }

    /// Load every location the resolver offers for `namespace`.
    pub fn visit_namespace(&mut self, namespace: &str) {
        if self.context.is_built_in(namespace) {
            return;
        }
        if let Err(err) = Url::parse(namespace) {
            self.staging.record(
                Finding::new(FindingCode::InvalidNamespaceUri, namespace)
                    .with_param(namespace)
                    .with_param(err.to_string()),
            );
            return;
        }

        let context = self.context;
        let scheme = context.default_scheme();
        let locations = self.resolver.resolve_import(namespace, scheme, &[]);
        if locations.is_empty() {
            self.record_unresolved(namespace, namespace, scheme);
            return;
        }
        for location in &locations {
            self.visit(location, Edge::import(namespace), 0);
        }
    }

    /// Visit a dependency. Any failure is recorded and the caller carries on.
    pub(super) fn visit(&mut self, location: &ModuleLocation, edge: Edge<'_>, depth: usize) {
        if self.is_known(location) {
            return;
        }
        if depth > self.config.max_depth {
            debug!(location = %location, depth, "Depth limit reached");
            self.staging.record(
                Finding::new(FindingCode::DepthLimitReached, location.as_str())
                    .with_param(self.config.max_depth.to_string()),
            );
            return;
        }

        self.staging.mark_visited(location);
        match self.fetch(location) {
            Ok(outcome) => self.process(location, outcome, edge, depth),
            Err(err) => {
                debug!(location = %location, error = %err, "Module load failed");
                self.staging.record(
                    Finding::new(FindingCode::UnknownExceptionDuringModuleLoad, location.as_str())
                        .with_param(err.to_string()),
                );
            }
        }
    }

    /// Staged in this pass, rejected in this pass, or already assembled.
    fn is_known(&self, location: &ModuleLocation) -> bool {
        self.staging.is_visited(location) || self.model.contains_location(location)
    }

    fn fetch(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        if self.loader.is_library_location(location) {
            self.loader.load_library(location)
        } else {
            self.loader.load_schema(location)
        }
    }

    fn process(
        &mut self,
        location: &ModuleLocation,
        outcome: LoadOutcome,
        edge: Edge<'_>,
        depth: usize,
    ) {
        self.staging.record_all(outcome.findings);
        let Some(descriptor) = outcome.descriptor else {
            debug!(location = %location, "Module rejected by loader");
            return;
        };
        let Some(descriptor) = self.check_identity(location, descriptor, edge) else {
            debug!(location = %location, "Module rejected: namespace mismatch");
            return;
        };
        if self.config.enforce_crc && !self.check_crc(location, &descriptor) {
            debug!(location = %location, "Module rejected: checksum");
            return;
        }

        let namespace = descriptor.namespace().map(str::to_string);
        let identity = descriptor.identity();
        let logical_name = descriptor.logical_name.clone();
        let includes = descriptor.includes.clone();
        let imports = descriptor.imports.clone();
        let is_library = descriptor.kind() == ModuleKind::Library;
        let context = self.context;
        let scheme = context.scheme_for(descriptor.version_scheme_id.as_deref());

        debug!(
            location = %location,
            identity = %identity,
            kind = descriptor.kind().as_str(),
            "Module staged"
        );
        self.staging.stage(location.clone(), descriptor);

        for include in &includes {
            self.follow_include(location, namespace.as_deref(), include, depth + 1);
        }
        for import in &imports {
            self.follow_import(location, &identity, scheme, import, depth + 1);
        }
        if is_library && self.config.backfill_versions {
            if let Some(namespace) = namespace.as_deref() {
                self.backfill(location, namespace, &logical_name, scheme, depth + 1);
            }
        }
    }

    /// Check the namespace a module reports against what its edge expects.
    ///
    /// Returns the descriptor to stage (adopted, for a chameleon include) or
    /// `None` after recording why it was rejected.
    fn check_identity(
        &mut self,
        location: &ModuleLocation,
        descriptor: ModuleDescriptor,
        edge: Edge<'_>,
    ) -> Option<ModuleDescriptor> {
        let mismatch = match edge.kind {
            EdgeKind::Root => return Some(descriptor),
            EdgeKind::Include => FindingCode::NamespaceMismatchOnInclude,
            EdgeKind::Import => FindingCode::NamespaceMismatchOnImport,
        };

        let actual = descriptor.namespace().map(str::to_string);
        match (edge.expected, actual.as_deref()) {
            (Some(expected), None) if descriptor.is_chameleon() => {
                if edge.kind == EdgeKind::Include {
                    return Some(descriptor.adopt_namespace(expected));
                }
                self.staging.record(
                    Finding::new(FindingCode::IllegalChameleonImport, location.as_str())
                        .with_param(expected),
                );
                return None;
            }
            (None, None) => return Some(descriptor),
            (Some(expected), Some(actual)) => {
                let scheme = self
                    .context
                    .scheme_for(descriptor.version_scheme_id.as_deref());
                if expected == actual || scheme.is_allowed_variation(expected, actual) {
                    return Some(descriptor);
                }
            }
            _ => {}
        }

        self.staging.record(
            Finding::new(mismatch, location.as_str())
                .with_param(edge.expected.unwrap_or_default())
                .with_param(actual.unwrap_or_default()),
        );
        None
    }

    fn check_crc(&mut self, location: &ModuleLocation, descriptor: &ModuleDescriptor) -> bool {
        match crc::verify(descriptor) {
            CrcCheck::Valid | CrcCheck::NotRequired => true,
            CrcCheck::Missing => {
                self.staging.record(
                    Finding::new(FindingCode::MissingCrc, location.as_str())
                        .with_param(descriptor.identity()),
                );
                false
            }
            CrcCheck::Invalid { declared, computed } => {
                self.staging.record(
                    Finding::new(FindingCode::InvalidCrc, location.as_str())
                        .with_param(descriptor.identity())
                        .with_param(declared)
                        .with_param(computed),
                );
                false
            }
        }
    }

    fn follow_include(
        &mut self,
        host: &ModuleLocation,
        host_namespace: Option<&str>,
        path: &str,
        depth: usize,
    ) {
        let target = self
            .resolver
            .resolve_include(host_namespace.unwrap_or_default(), path)
            .or_else(|| host.join(path));
        match target {
            Some(location) => self.visit(&location, Edge::include(host_namespace), depth),
            None => self.staging.record(
                Finding::new(FindingCode::UnresolvedInclude, host.as_str()).with_param(path),
            ),
        }
    }

    fn follow_import(
        &mut self,
        host: &ModuleLocation,
        host_identity: &str,
        scheme: &dyn VersionScheme,
        import: &NamespaceImport,
        depth: usize,
    ) {
        let Some(namespace) = import.namespace() else {
            self.staging.record(
                Finding::new(FindingCode::MissingNamespaceUri, host_identity)
                    .with_param(import.prefix.as_str()),
            );
            return;
        };
        if let Err(err) = Url::parse(namespace) {
            self.staging.record(
                Finding::new(FindingCode::InvalidNamespaceUri, host_identity)
                    .with_param(namespace)
                    .with_param(err.to_string()),
            );
            return;
        }
        if self.context.is_built_in(namespace) {
            return;
        }

        let hints: Vec<String> = import
            .file_hints
            .iter()
            .filter_map(|hint| host.join(hint))
            .map(|location| location.to_string())
            .collect();
        let locations = self.resolver.resolve_import(namespace, scheme, &hints);
        if locations.is_empty() {
            self.record_unresolved(host_identity, namespace, scheme);
            return;
        }
        for location in &locations {
            self.visit(location, Edge::import(namespace), depth);
        }
    }

    /// Record that `namespace` could not be located for `source`, unless
    /// something already supplies it.
    fn record_unresolved(&mut self, source: &str, namespace: &str, scheme: &dyn VersionScheme) {
        if self.staging.contains_namespace(namespace) || self.model.satisfies(namespace, scheme) {
            return;
        }
        debug!(source, namespace, "Namespace unresolved");
        self.staging.record_unresolved(
            ImportFindingKey::new(source, namespace, scheme.id()),
            Finding::new(FindingCode::UnresolvedLibraryNamespace, source).with_param(namespace),
        );
    }
}
