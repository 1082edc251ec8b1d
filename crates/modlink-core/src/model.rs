//! The cumulative model of resolved modules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::{ModuleKind, NamespaceImport};
use crate::location::ModuleLocation;
use crate::scheme::VersionScheme;

/// Unique key of a module in the model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleKey {
    pub namespace: String,
    pub name: String,
}

impl ModuleKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// A module assembled into the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelModule {
    pub key: ModuleKey,
    pub kind: ModuleKind,
    pub location: ModuleLocation,
    pub version_scheme: String,
    pub includes: Vec<String>,
    pub imports: Vec<NamespaceImport>,
    /// Checksum computed at assembly, libraries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc: Option<String>,
}

/// All modules resolved so far, keyed by `(namespace, name)`.
///
/// Built-in namespaces count as present without holding any module.
#[derive(Debug, Clone, Default)]
pub struct ResolvedModel {
    modules: BTreeMap<ModuleKey, ModelModule>,
    by_location: BTreeMap<ModuleLocation, ModuleKey>,
    built_ins: BTreeSet<String>,
}

impl ResolvedModel {
    /// An empty model with the given built-in namespaces.
    pub fn new<S: Into<String>>(built_ins: impl IntoIterator<Item = S>) -> Self {
        Self {
            modules: BTreeMap::new(),
            by_location: BTreeMap::new(),
            built_ins: built_ins.into_iter().map(Into::into).collect(),
        }
    }

    /// Insert a module.
    ///
    /// Returns the module back if its key is taken.
    pub fn insert(&mut self, module: ModelModule) -> Result<(), ModelModule> {
        if self.modules.contains_key(&module.key) {
            return Err(module);
        }
        self.by_location
            .insert(module.location.clone(), module.key.clone());
        self.modules.insert(module.key.clone(), module);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &ModuleKey) -> Option<&ModelModule> {
        self.modules.get(key)
    }

    #[must_use]
    pub fn get_by_location(&self, location: &ModuleLocation) -> Option<&ModelModule> {
        self.by_location
            .get(location)
            .and_then(|key| self.modules.get(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &ModuleKey) -> bool {
        self.modules.contains_key(key)
    }

    #[must_use]
    pub fn contains_location(&self, location: &ModuleLocation) -> bool {
        self.by_location.contains_key(location)
    }

    /// Whether any module lives in `namespace`, or it is built in.
    #[must_use]
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        if self.built_ins.contains(namespace) {
            return true;
        }
        self.modules
            .range(ModuleKey::new(namespace, "")..)
            .next()
            .is_some_and(|(key, _)| key.namespace == namespace)
    }

    /// Whether `namespace` is present exactly, or through a module whose
    /// namespace `scheme` accepts in its place.
    #[must_use]
    pub fn satisfies(&self, namespace: &str, scheme: &dyn VersionScheme) -> bool {
        self.contains_namespace(namespace)
            || self
                .namespaces()
                .any(|present| scheme.is_allowed_variation(namespace, present))
    }

    #[must_use]
    pub fn is_built_in(&self, namespace: &str) -> bool {
        self.built_ins.contains(namespace)
    }

    /// Modules in `namespace`.
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a ModelModule> {
        self.modules
            .range(ModuleKey::new(namespace, "")..)
            .take_while(move |(key, _)| key.namespace == namespace)
            .map(|(_, module)| module)
    }

    /// All modules in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelModule> {
        self.modules.values()
    }

    /// Distinct non-built-in namespaces, sorted.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        let mut last: Option<&str> = None;
        self.modules.keys().filter_map(move |key| {
            let ns = key.namespace.as_str();
            if last == Some(ns) {
                None
            } else {
                last = Some(ns);
                Some(ns)
            }
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
