//! Process-wide parsing state.
//!
//! A [`ParsingContext`] is built once, configured, then shared behind an
//! `Arc` by every engine that needs it. It is never mutated after sharing:
//! registration methods take `&mut self`, so they can only run before the
//! context is wrapped.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::scheme::{SuffixVersionScheme, VersionScheme};

/// XML Schema definition namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespaces that are always present and never fetched.
pub const BUILT_IN_NAMESPACES: &[&str] = &[XSD_NAMESPACE, XML_NAMESPACE];

/// Version schemes and built-in namespaces shared by engines.
#[derive(Debug, Clone)]
pub struct ParsingContext {
    schemes: BTreeMap<String, Arc<dyn VersionScheme>>,
    default_scheme: Arc<dyn VersionScheme>,
    built_ins: BTreeSet<String>,
}

impl Default for ParsingContext {
    fn default() -> Self {
        Self::standard()
    }
}

impl ParsingContext {
    /// Context with the suffix scheme as default and the XML built-ins.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_default_scheme(Arc::new(SuffixVersionScheme::new()))
    }

    /// Context using `scheme` as the default.
    #[must_use]
    pub fn with_default_scheme(scheme: Arc<dyn VersionScheme>) -> Self {
        let mut schemes = BTreeMap::new();
        schemes.insert(scheme.id().to_string(), Arc::clone(&scheme));
        Self {
            schemes,
            default_scheme: scheme,
            built_ins: BUILT_IN_NAMESPACES.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Register an additional scheme under its id.
    pub fn register_scheme(&mut self, scheme: Arc<dyn VersionScheme>) {
        self.schemes.insert(scheme.id().to_string(), scheme);
    }

    /// Mark `namespace` as built in.
    pub fn add_built_in(&mut self, namespace: impl Into<String>) {
        self.built_ins.insert(namespace.into());
    }

    /// Freeze the context for sharing.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Look up a scheme by id.
    #[must_use]
    pub fn scheme(&self, id: &str) -> Option<&dyn VersionScheme> {
        self.schemes.get(id).map(Arc::as_ref)
    }

    /// Scheme for a module's declared id, falling back to the default for
    /// absent or unknown ids.
    #[must_use]
    pub fn scheme_for(&self, id: Option<&str>) -> &dyn VersionScheme {
        id.and_then(|id| self.scheme(id))
            .unwrap_or_else(|| self.default_scheme.as_ref())
    }

    #[must_use]
    pub fn default_scheme(&self) -> &dyn VersionScheme {
        self.default_scheme.as_ref()
    }

    #[must_use]
    pub fn default_scheme_id(&self) -> &str {
        self.default_scheme.id()
    }

    #[must_use]
    pub fn is_built_in(&self, namespace: &str) -> bool {
        self.built_ins.contains(namespace)
    }

    pub fn built_ins(&self) -> impl Iterator<Item = &str> {
        self.built_ins.iter().map(String::as_str)
    }
}
