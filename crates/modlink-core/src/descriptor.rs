//! Parsed module descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cross-namespace dependency declared by a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceImport {
    /// Namespace being imported; required for a valid import.
    #[serde(default, rename = "namespace", skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    /// Prefix the importing module uses for the namespace.
    #[serde(default)]
    pub prefix: String,
    /// Relative or absolute locations suggested by the author.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_hints: Vec<String>,
}

impl NamespaceImport {
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            target_namespace: Some(namespace.into()),
            prefix: prefix.into(),
            file_hints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_file_hint(mut self, hint: impl Into<String>) -> Self {
        self.file_hints.push(hint.into());
        self
    }

    /// The target namespace, treating blank as absent.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.target_namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }
}

/// Publication status of a library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStatus {
    #[default]
    Draft,
    UnderReview,
    Final,
    Obsolete,
}

impl LibraryStatus {
    /// Published libraries must carry a checksum.
    #[must_use]
    pub fn requires_crc(&self) -> bool {
        matches!(self, Self::Final | Self::Obsolete)
    }
}

/// Payload of a library artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPayload {
    pub status: LibraryStatus,
    /// Checksum declared by the library itself.
    pub declared_crc: Option<String>,
    /// Library body, opaque to the engine.
    pub content: Value,
}

/// Payload of a schema artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPayload {
    /// Schema body, opaque to the engine.
    pub content: Value,
}

/// Whether a module is a library or a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Library,
    Schema,
}

impl ModuleKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Schema => "schema",
        }
    }
}

/// The parsed artifact behind a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModuleArtifact {
    Library(LibraryPayload),
    Schema(SchemaPayload),
}

impl ModuleArtifact {
    #[must_use]
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Library(_) => ModuleKind::Library,
            Self::Schema(_) => ModuleKind::Schema,
        }
    }

    #[must_use]
    pub fn content(&self) -> &Value {
        match self {
            Self::Library(library) => &library.content,
            Self::Schema(schema) => &schema.content,
        }
    }
}

/// Everything the engine needs to know about one loaded module.
///
/// Descriptors are immutable once built; [`ModuleDescriptor::adopt_namespace`]
/// returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub artifact: ModuleArtifact,
    pub logical_name: String,
    /// Declared namespace; `None` for a chameleon schema.
    pub namespace: Option<String>,
    /// Version scheme id; `None` selects the context default.
    pub version_scheme_id: Option<String>,
    /// Same-namespace fragments, in declaration order.
    pub includes: Vec<String>,
    /// Cross-namespace dependencies, in declaration order.
    pub imports: Vec<NamespaceImport>,
}

impl ModuleDescriptor {
    /// A library descriptor with empty content.
    pub fn library(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            artifact: ModuleArtifact::Library(LibraryPayload {
                status: LibraryStatus::default(),
                declared_crc: None,
                content: Value::Null,
            }),
            logical_name: name.into(),
            namespace: Some(namespace.into()),
            version_scheme_id: None,
            includes: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// A schema descriptor with empty content; `namespace` of `None` makes
    /// it a chameleon.
    pub fn schema(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            artifact: ModuleArtifact::Schema(SchemaPayload {
                content: Value::Null,
            }),
            logical_name: name.into(),
            namespace: namespace.map(str::to_string),
            version_scheme_id: None,
            includes: Vec::new(),
            imports: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    #[must_use]
    pub fn with_import(mut self, import: NamespaceImport) -> Self {
        self.imports.push(import);
        self
    }

    #[must_use]
    pub fn with_version_scheme(mut self, id: impl Into<String>) -> Self {
        self.version_scheme_id = Some(id.into());
        self
    }

    /// Replace the artifact body.
    #[must_use]
    pub fn with_content(mut self, content: Value) -> Self {
        match &mut self.artifact {
            ModuleArtifact::Library(library) => library.content = content,
            ModuleArtifact::Schema(schema) => schema.content = content,
        }
        self
    }

    /// Set library status and declared checksum; no-op for schemas.
    #[must_use]
    pub fn with_library_meta(mut self, status: LibraryStatus, crc: Option<String>) -> Self {
        if let ModuleArtifact::Library(library) = &mut self.artifact {
            library.status = status;
            library.declared_crc = crc;
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> ModuleKind {
        self.artifact.kind()
    }

    /// Declared namespace, treating blank as absent.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }

    /// True for a schema without a namespace of its own.
    #[must_use]
    pub fn is_chameleon(&self) -> bool {
        self.kind() == ModuleKind::Schema && self.namespace().is_none()
    }

    /// A copy of this descriptor living in `namespace`.
    #[must_use]
    pub fn adopt_namespace(&self, namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..self.clone()
        }
    }

    /// Identity used as the subject of findings about this module.
    #[must_use]
    pub fn identity(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}:{}", self.logical_name),
            None => self.logical_name.clone(),
        }
    }
}
