//! Resolution engine.
//!
//! One call to [`ResolutionEngine::load_module`] or
//! [`ResolutionEngine::load_namespace`] is one pass:
//!
//! 1. descend from the root into a fresh [`StagingArea`],
//! 2. fold the pass findings into the ledger,
//! 3. assemble the staged modules into the model,
//! 4. prune stale import findings and validate the model.
//!
//! The model and the ledger survive between passes, so an engine can be fed
//! more inputs until its findings converge.

mod backfill;
mod descent;

use std::sync::Arc;
use tracing::debug;

use crate::assembler::GraphAssembler;
use crate::config::EngineConfig;
use crate::context::ParsingContext;
use crate::contracts::{
    ModelAssembler, ModelValidator, ModuleLoader, NamespaceResolver, NoResolver, NoValidation,
};
use crate::error::Error;
use crate::findings::{Finding, FindingCode, Findings};
use crate::ledger::FindingsLedger;
use crate::location::InputSource;
use crate::model::ResolvedModel;
use crate::staging::StagingArea;

use descent::Descent;

/// Subject of findings about the model as a whole.
pub const MODEL_SUBJECT: &str = "<model>";

/// Builder for [`ResolutionEngine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    context: Option<Arc<ParsingContext>>,
    config: EngineConfig,
    loader: Option<Box<dyn ModuleLoader>>,
    resolver: Option<Box<dyn NamespaceResolver>>,
    assembler: Option<Box<dyn ModelAssembler>>,
    validator: Option<Box<dyn ModelValidator>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing parsing context. Defaults to
    /// [`ParsingContext::standard`].
    #[must_use]
    pub fn with_context(mut self, context: Arc<ParsingContext>) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the module loader. Required.
    #[must_use]
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: impl NamespaceResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    #[must_use]
    pub fn with_assembler(mut self, assembler: impl ModelAssembler + 'static) -> Self {
        self.assembler = Some(Box::new(assembler));
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl ModelValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Build the engine.
    ///
    /// Fails with [`Error::NoModuleLoader`] if no loader was set.
    pub fn build(self) -> Result<ResolutionEngine, Error> {
        let loader = self.loader.ok_or(Error::NoModuleLoader)?;
        let context = self
            .context
            .unwrap_or_else(|| ParsingContext::standard().into_shared());
        let assembler = self
            .assembler
            .unwrap_or_else(|| Box::new(GraphAssembler::new(context.default_scheme_id())));
        let model = ResolvedModel::new(context.built_ins());

        Ok(ResolutionEngine {
            config: self.config,
            loader,
            resolver: self.resolver.unwrap_or_else(|| Box::new(NoResolver)),
            assembler,
            validator: self.validator.unwrap_or_else(|| Box::new(NoValidation)),
            model,
            ledger: FindingsLedger::new(),
            context,
        })
    }
}

/// Loads modules and their transitive dependencies into a [`ResolvedModel`].
///
/// Loads take `&mut self`; one engine runs one pass at a time.
#[derive(Debug)]
pub struct ResolutionEngine {
    context: Arc<ParsingContext>,
    config: EngineConfig,
    loader: Box<dyn ModuleLoader>,
    resolver: Box<dyn NamespaceResolver>,
    assembler: Box<dyn ModelAssembler>,
    validator: Box<dyn ModelValidator>,
    model: ResolvedModel,
    ledger: FindingsLedger,
}

impl ResolutionEngine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Load every module the resolver knows for `namespace`.
    ///
    /// Built-in namespaces are never loaded. A namespace nobody can locate
    /// yields an `UNRESOLVED_LIBRARY_NAMESPACE` warning.
    pub fn load_namespace(&mut self, namespace: &str) -> Findings {
        debug!(namespace, "Loading namespace");
        let mut staging = StagingArea::new();
        self.descent(&mut staging).visit_namespace(namespace);
        self.finish_pass(staging)
    }

    /// Load a root module and everything it needs.
    ///
    /// The root skips the namespace identity check. A root the loader cannot
    /// read is fatal; an unreadable dependency is only a finding.
    pub fn load_module(&mut self, input: impl Into<InputSource>) -> Result<Findings, Error> {
        let location = input.into().to_location()?;
        debug!(location = %location, "Loading module");

        let mut staging = StagingArea::new();
        self.descent(&mut staging)
            .visit_root(&location)
            .map_err(|source| Error::RootUnreadable {
                location: location.clone(),
                source,
            })?;
        Ok(self.finish_pass(staging))
    }

    /// The model assembled so far.
    #[must_use]
    pub fn resolved_model(&self) -> &ResolvedModel {
        &self.model
    }

    /// Every finding recorded so far, minus import findings the model has
    /// since satisfied.
    #[must_use]
    pub fn cumulative_findings(&self) -> Findings {
        self.ledger.current(&self.model, &self.context)
    }

    #[must_use]
    pub fn context(&self) -> &Arc<ParsingContext> {
        &self.context
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn descent<'a>(&'a self, staging: &'a mut StagingArea) -> Descent<'a> {
        Descent::new(
            &self.context,
            &self.config,
            &*self.loader,
            &*self.resolver,
            &self.model,
            staging,
        )
    }

    fn finish_pass(&mut self, mut staging: StagingArea) -> Findings {
        let (general, unresolved) = staging.take_findings();
        self.ledger.record_all(general);
        for (key, finding) in unresolved {
            self.ledger.record_import(key, finding);
        }

        let staged = staging.len();
        match self.assembler.assemble(staging, &mut self.model) {
            Ok(findings) => self.ledger.record_all(findings),
            Err(err) => self.ledger.record(
                Finding::new(FindingCode::UnknownExceptionDuringTransformation, MODEL_SUBJECT)
                    .with_param(err.to_string()),
            ),
        }

        let pruned = self.ledger.prune(&self.model, &self.context);
        debug!(
            staged,
            pruned,
            modules = self.model.len(),
            "Resolution pass complete"
        );

        let mut findings = self.ledger.current(&self.model, &self.context);
        match self.validator.validate(&self.model) {
            Ok(validation) => findings.extend(validation),
            Err(err) => findings.push(
                Finding::new(FindingCode::UnknownExceptionDuringValidation, MODEL_SUBJECT)
                    .with_param(err.to_string()),
            ),
        }
        findings
    }
}
