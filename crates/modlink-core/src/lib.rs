#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Module resolution engine for the modlink schema compiler.
//!
//! Loads one library or schema module and everything it transitively needs
//! (includes, imports, earlier minor versions of imported namespaces) into a
//! [`ResolvedModel`], reporting every anomaly as a [`Finding`].

pub mod assembler;
pub mod config;
pub mod context;
pub mod contracts;
pub mod crc;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod findings;
pub mod ledger;
pub mod local;
pub mod location;
pub mod model;
pub mod scheme;
pub mod staging;
pub mod version;

pub use assembler::GraphAssembler;
pub use config::EngineConfig;
pub use context::ParsingContext;
pub use contracts::{
    CollaboratorError, LoadError, LoadOutcome, ModelAssembler, ModelValidator, ModuleLoader,
    NamespaceResolver, NoResolver, NoValidation,
};
pub use descriptor::{
    LibraryPayload, LibraryStatus, ModuleArtifact, ModuleDescriptor, ModuleKind, NamespaceImport,
    SchemaPayload,
};
pub use engine::{EngineBuilder, ResolutionEngine};
pub use error::Error;
pub use findings::{Finding, FindingCode, Findings, Severity};
pub use ledger::{FindingsLedger, ImportFindingKey};
pub use local::{CatalogResolver, FsModuleLoader};
pub use location::{InputSource, ModuleLocation};
pub use model::{ModelModule, ModuleKey, ResolvedModel};
pub use scheme::{SuffixVersionScheme, VersionScheme};
pub use staging::StagingArea;
pub use version::VERSION;
