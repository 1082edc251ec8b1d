use modlink_util::fs::{read_to_string_lossy, stem_without};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::contracts::{LoadError, LoadOutcome, ModuleLoader};
use crate::descriptor::{
    LibraryPayload, LibraryStatus, ModuleArtifact, ModuleDescriptor, NamespaceImport,
    SchemaPayload,
};
use crate::findings::{Finding, FindingCode, Findings};
use crate::location::ModuleLocation;

/// File suffix that marks a library document.
pub const LIBRARY_EXTENSION: &str = ".lib.json";

/// On-disk shape of a module document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleDocument {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub version_scheme: Option<String>,
    pub status: LibraryStatus,
    pub crc: Option<String>,
    pub includes: Vec<String>,
    pub imports: Vec<NamespaceImport>,
    pub content: Value,
}

impl ModuleDocument {
    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build a descriptor; `fallback_name` is used when the document has
    /// no name of its own.
    #[must_use]
    pub fn into_descriptor(self, library: bool, fallback_name: String) -> ModuleDescriptor {
        let artifact = if library {
            ModuleArtifact::Library(LibraryPayload {
                status: self.status,
                declared_crc: self.crc,
                content: self.content,
            })
        } else {
            ModuleArtifact::Schema(SchemaPayload {
                content: self.content,
            })
        };
        ModuleDescriptor {
            artifact,
            logical_name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(fallback_name),
            namespace: self.namespace,
            version_scheme_id: self.version_scheme,
            includes: self.includes,
            imports: self.imports,
        }
    }
}

/// Loads JSON module documents from `file:` locations.
///
/// Files ending in [`LIBRARY_EXTENSION`] are libraries; every other file is
/// a schema.
#[derive(Debug, Clone, Default)]
pub struct FsModuleLoader;

impl FsModuleLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn load(location: &ModuleLocation, library: bool) -> Result<LoadOutcome, LoadError> {
        let path = location
            .to_file_path()
            .ok_or_else(|| LoadError::Unsupported(location.scheme().to_string()))?;
        let text = read_to_string_lossy(&path)?;

        match ModuleDocument::parse(&text) {
            Ok(document) => {
                let descriptor = document.into_descriptor(library, fallback_name(&path));
                Ok(LoadOutcome::loaded(descriptor))
            }
            Err(err) => {
                let mut findings = Findings::new();
                findings.push(
                    Finding::new(FindingCode::ModuleParseError, location.as_str())
                        .with_param(err.to_string()),
                );
                Ok(LoadOutcome::failed(findings))
            }
        }
    }
}

fn fallback_name(path: &Path) -> String {
    stem_without(path, LIBRARY_EXTENSION).unwrap_or_default()
}

impl ModuleLoader for FsModuleLoader {
    fn is_library_location(&self, location: &ModuleLocation) -> bool {
        location.url().path().ends_with(LIBRARY_EXTENSION)
    }

    fn load_library(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        Self::load(location, true)
    }

    fn load_schema(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        Self::load(location, false)
    }
}
