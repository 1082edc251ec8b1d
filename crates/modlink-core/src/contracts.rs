//! Collaborator contracts the engine drives.
//!
//! Parsing, location lookup, model assembly and validation all live behind
//! these traits. The engine only orchestrates them.

use std::fmt;
use thiserror::Error;

use crate::descriptor::ModuleDescriptor;
use crate::findings::Findings;
use crate::location::ModuleLocation;
use crate::model::ResolvedModel;
use crate::scheme::VersionScheme;
use crate::staging::StagingArea;

/// Failure reported by an assembler or validator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Maps namespaces and include paths to module locations.
pub trait NamespaceResolver: fmt::Debug {
    /// Candidate locations for `namespace`.
    ///
    /// `file_hints` are absolute locations derived from the import's hints
    /// and should be preferred when they exist. An empty result means the
    /// namespace could not be resolved.
    fn resolve_import(
        &self,
        namespace: &str,
        scheme: &dyn VersionScheme,
        file_hints: &[String],
    ) -> Vec<ModuleLocation>;

    /// Location for an include path, if this resolver knows better than a
    /// plain relative join.
    fn resolve_include(&self, namespace: &str, relative_path: &str) -> Option<ModuleLocation>;
}

/// Resolver that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl NamespaceResolver for NoResolver {
    fn resolve_import(
        &self,
        _namespace: &str,
        _scheme: &dyn VersionScheme,
        _file_hints: &[String],
    ) -> Vec<ModuleLocation> {
        Vec::new()
    }

    fn resolve_include(&self, _namespace: &str, _relative_path: &str) -> Option<ModuleLocation> {
        None
    }
}

/// Result of a load that reached the module content.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// The parsed module, or `None` if the content was unusable.
    pub descriptor: Option<ModuleDescriptor>,
    /// Problems found while parsing.
    pub findings: Findings,
}

impl LoadOutcome {
    #[must_use]
    pub fn loaded(descriptor: ModuleDescriptor) -> Self {
        Self {
            descriptor: Some(descriptor),
            findings: Findings::new(),
        }
    }

    #[must_use]
    pub fn failed(findings: Findings) -> Self {
        Self {
            descriptor: None,
            findings,
        }
    }
}

/// Failure to reach a module's content at all.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read module: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("unsupported location scheme '{0}'")]
    Unsupported(String),

    #[error("{0}")]
    Other(CollaboratorError),
}

/// Fetches and parses modules.
pub trait ModuleLoader: fmt::Debug {
    /// Whether `location` holds a library (as opposed to a schema).
    fn is_library_location(&self, location: &ModuleLocation) -> bool;

    fn load_library(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError>;

    fn load_schema(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError>;
}

/// Turns staged descriptors into model entities.
pub trait ModelAssembler: fmt::Debug {
    /// Consume the staging area, inserting its modules into `model`.
    ///
    /// Returns findings for modules that could not be inserted.
    fn assemble(
        &self,
        staging: StagingArea,
        model: &mut ResolvedModel,
    ) -> Result<Findings, CollaboratorError>;
}

/// Checks an assembled model.
pub trait ModelValidator: fmt::Debug {
    fn validate(&self, model: &ResolvedModel) -> Result<Findings, CollaboratorError>;
}

/// Validator that accepts every model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl ModelValidator for NoValidation {
    fn validate(&self, _model: &ResolvedModel) -> Result<Findings, CollaboratorError> {
        Ok(Findings::new())
    }
}
