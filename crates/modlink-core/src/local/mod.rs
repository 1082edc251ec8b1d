//! File-system collaborators.
//!
//! Modules are JSON documents on disk. [`FsModuleLoader`] parses them and
//! [`CatalogResolver`] maps namespaces to their locations.

mod catalog;
mod loader;

pub use catalog::{CatalogEntry, CatalogFile, CatalogResolver};
pub use loader::{FsModuleLoader, ModuleDocument, LIBRARY_EXTENSION};
