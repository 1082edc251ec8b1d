//! In-memory module world shared by the engine tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use modlink_core::{
    LoadError, LoadOutcome, ModuleDescriptor, ModuleLoader, ModuleLocation, NamespaceResolver,
    ResolutionEngine, VersionScheme,
};

pub const BASE: &str = "https://modules.test/";

/// Location of `name` in the test world.
pub fn loc(name: &str) -> ModuleLocation {
    ModuleLocation::parse(&format!("{BASE}{name}")).unwrap()
}

#[derive(Debug, Clone)]
enum Entry {
    Module(ModuleDescriptor),
    Unreadable,
}

#[derive(Debug, Default)]
pub struct World {
    entries: RefCell<BTreeMap<ModuleLocation, Entry>>,
    catalog: RefCell<BTreeMap<String, Vec<ModuleLocation>>>,
    fetches: RefCell<BTreeMap<ModuleLocation, usize>>,
}

/// Handle to a [`World`] usable as both loader and resolver.
#[derive(Debug, Clone, Default)]
pub struct SharedWorld(pub Rc<World>);

impl SharedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a module at `name` without making it discoverable.
    pub fn add(&self, name: &str, descriptor: ModuleDescriptor) {
        self.0
            .entries
            .borrow_mut()
            .insert(loc(name), Entry::Module(descriptor));
    }

    /// Put a module at `name` and list it under its declared namespace.
    pub fn publish(&self, name: &str, descriptor: ModuleDescriptor) {
        if let Some(ns) = descriptor.namespace() {
            self.map(ns, name);
        }
        self.add(name, descriptor);
    }

    /// List `name` under `namespace`, whatever the module declares.
    pub fn map(&self, namespace: &str, name: &str) {
        self.0
            .catalog
            .borrow_mut()
            .entry(namespace.to_string())
            .or_default()
            .push(loc(name));
    }

    /// A location the loader cannot read.
    pub fn add_unreadable(&self, name: &str) {
        self.0
            .entries
            .borrow_mut()
            .insert(loc(name), Entry::Unreadable);
    }

    pub fn fetch_count(&self, name: &str) -> usize {
        self.0
            .fetches
            .borrow()
            .get(&loc(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn engine(&self) -> ResolutionEngine {
        ResolutionEngine::builder()
            .with_loader(self.clone())
            .with_resolver(self.clone())
            .build()
            .unwrap()
    }

    fn load(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        *self
            .0
            .fetches
            .borrow_mut()
            .entry(location.clone())
            .or_default() += 1;

        match self.0.entries.borrow().get(location) {
            Some(Entry::Module(descriptor)) => Ok(LoadOutcome::loaded(descriptor.clone())),
            Some(Entry::Unreadable) | None => Err(LoadError::Unreadable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{location} not found"),
            ))),
        }
    }
}

impl ModuleLoader for SharedWorld {
    fn is_library_location(&self, location: &ModuleLocation) -> bool {
        location.as_str().ends_with(".lib.json")
    }

    fn load_library(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        self.load(location)
    }

    fn load_schema(&self, location: &ModuleLocation) -> Result<LoadOutcome, LoadError> {
        self.load(location)
    }
}

impl NamespaceResolver for SharedWorld {
    fn resolve_import(
        &self,
        namespace: &str,
        scheme: &dyn VersionScheme,
        file_hints: &[String],
    ) -> Vec<ModuleLocation> {
        let entries = self.0.entries.borrow();
        let mut out: Vec<ModuleLocation> = file_hints
            .iter()
            .filter_map(|hint| ModuleLocation::parse(hint).ok())
            .filter(|location| entries.contains_key(location))
            .collect();

        for (candidate, locations) in self.0.catalog.borrow().iter() {
            if candidate == namespace || scheme.is_allowed_variation(namespace, candidate) {
                for location in locations {
                    if !out.contains(location) {
                        out.push(location.clone());
                    }
                }
            }
        }
        out
    }

    fn resolve_include(&self, _namespace: &str, _relative_path: &str) -> Option<ModuleLocation> {
        None
    }
}
