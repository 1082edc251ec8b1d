use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::loader::ModuleDocument;
use crate::contracts::NamespaceResolver;
use crate::error::Error;
use crate::location::{InputSource, ModuleLocation};
use crate::scheme::VersionScheme;

/// One namespace-to-location mapping in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub namespace: String,
    /// Absolute URL, or a path relative to the catalog file.
    pub location: String,
}

/// A catalog file: `{"entries": [{"namespace": ..., "location": ...}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

/// Resolves namespaces through catalog files and indexed directories.
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    entries: BTreeMap<String, Vec<ModuleLocation>>,
}

impl CatalogResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `namespace` to `location`. Duplicate pairs are ignored.
    pub fn insert(&mut self, namespace: impl Into<String>, location: ModuleLocation) {
        let locations = self.entries.entry(namespace.into()).or_default();
        if !locations.contains(&location) {
            locations.push(location);
        }
    }

    #[must_use]
    pub fn with_entry(mut self, namespace: impl Into<String>, location: ModuleLocation) -> Self {
        self.insert(namespace, location);
        self
    }

    /// Add every entry of a catalog file.
    ///
    /// Returns the number of entries added. Entries whose location cannot be
    /// resolved are skipped with a warning.
    pub fn load_catalog(&mut self, path: &Path) -> Result<usize, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: CatalogFile =
            serde_json::from_str(&text).map_err(|source| Error::CatalogParse {
                path: path.to_path_buf(),
                source,
            })?;
        let base = InputSource::File(path.to_path_buf()).to_location()?;

        let mut added = 0;
        for entry in catalog.entries {
            match base.join(&entry.location) {
                Some(location) => {
                    self.insert(entry.namespace, location);
                    added += 1;
                }
                None => warn!(
                    catalog = %path.display(),
                    namespace = %entry.namespace,
                    location = %entry.location,
                    "Skipping unresolvable catalog entry"
                ),
            }
        }
        debug!(catalog = %path.display(), added, "Loaded catalog");
        Ok(added)
    }

    /// Index every `*.json` module document under `root` by its declared
    /// namespace.
    ///
    /// Documents without a namespace and files that do not parse are
    /// skipped. Returns the number of documents indexed.
    pub fn index_directory(&mut self, root: &Path) -> Result<usize, Error> {
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        let mut indexed = 0;
        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let document = match std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|text| ModuleDocument::parse(&text).map_err(|e| e.to_string()))
            {
                Ok(document) => document,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping unreadable document");
                    continue;
                }
            };
            let Some(namespace) = document
                .namespace
                .as_deref()
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
            else {
                continue;
            };
            if let Some(location) = ModuleLocation::from_file_path(path) {
                self.insert(namespace, location);
                indexed += 1;
            }
        }
        debug!(root = %root.display(), indexed, "Indexed directory");
        Ok(indexed)
    }

    /// Locations mapped to exactly `namespace`.
    #[must_use]
    pub fn locations(&self, namespace: &str) -> &[ModuleLocation] {
        self.entries.get(namespace).map_or(&[], Vec::as_slice)
    }

    /// Known namespaces, sorted.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn push_unique(out: &mut Vec<ModuleLocation>, location: &ModuleLocation) {
    if !out.contains(location) {
        out.push(location.clone());
    }
}

impl NamespaceResolver for CatalogResolver {
    fn resolve_import(
        &self,
        namespace: &str,
        scheme: &dyn VersionScheme,
        file_hints: &[String],
    ) -> Vec<ModuleLocation> {
        let mut out = Vec::new();

        for hint in file_hints {
            let Ok(location) = ModuleLocation::parse(hint) else {
                continue;
            };
            if location.to_file_path().is_some_and(|path| path.is_file()) {
                push_unique(&mut out, &location);
            }
        }

        for location in self.locations(namespace) {
            push_unique(&mut out, location);
        }
        for (candidate, locations) in &self.entries {
            if candidate != namespace && scheme.is_allowed_variation(namespace, candidate) {
                for location in locations {
                    push_unique(&mut out, location);
                }
            }
        }
        out
    }

    fn resolve_include(&self, _namespace: &str, relative_path: &str) -> Option<ModuleLocation> {
        ModuleLocation::parse(relative_path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SuffixVersionScheme;
    use std::fs;
    use tempfile::TempDir;

    const TRAVEL: &str = "http://example.com/ns/travel/v1";

    #[test]
    fn test_load_catalog_resolves_relative_locations() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("catalog.json");
        fs::write(
            &catalog,
            format!(r#"{{"entries": [{{"namespace": "{TRAVEL}", "location": "libs/Travel.lib.json"}}]}}"#),
        )
        .unwrap();

        let mut resolver = CatalogResolver::new();
        assert_eq!(resolver.load_catalog(&catalog).unwrap(), 1);

        let expected =
            ModuleLocation::from_file_path(&dir.path().join("libs/Travel.lib.json")).unwrap();
        assert_eq!(resolver.locations(TRAVEL), &[expected]);
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            CatalogResolver::new().load_catalog(&missing),
            Err(Error::CatalogRead { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "[").unwrap();
        assert!(matches!(
            CatalogResolver::new().load_catalog(&broken),
            Err(Error::CatalogParse { .. })
        ));
    }

    #[test]
    fn test_index_directory_by_namespace() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/Travel.lib.json"),
            format!(r#"{{"namespace": "{TRAVEL}"}}"#),
        )
        .unwrap();
        fs::write(dir.path().join("fragment.json"), r#"{"content": {}}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a module").unwrap();
        fs::write(dir.path().join("bad.json"), "{").unwrap();

        let mut resolver = CatalogResolver::new();
        assert_eq!(resolver.index_directory(dir.path()).unwrap(), 1);
        assert_eq!(resolver.namespaces().collect::<Vec<_>>(), vec![TRAVEL]);
    }

    #[test]
    fn test_resolve_import_prefers_existing_hints() {
        let dir = TempDir::new().unwrap();
        let hinted = dir.path().join("Hinted.lib.json");
        fs::write(&hinted, "{}").unwrap();
        let hinted = ModuleLocation::from_file_path(&hinted).unwrap();
        let absent = ModuleLocation::from_file_path(&dir.path().join("Absent.lib.json")).unwrap();
        let cataloged = ModuleLocation::parse("https://m.test/travel.lib.json").unwrap();

        let resolver = CatalogResolver::new().with_entry(TRAVEL, cataloged.clone());
        let found = resolver.resolve_import(
            TRAVEL,
            &SuffixVersionScheme::new(),
            &[absent.to_string(), hinted.to_string()],
        );
        assert_eq!(found, vec![hinted, cataloged]);
    }

    #[test]
    fn test_resolve_import_matches_allowed_variations() {
        let padded = ModuleLocation::parse("https://m.test/padded.lib.json").unwrap();
        let other = ModuleLocation::parse("https://m.test/other.lib.json").unwrap();
        let resolver = CatalogResolver::new()
            .with_entry("http://example.com/ns/travel/v01", padded.clone())
            .with_entry("http://example.com/ns/travel/v2", other);

        let found = resolver.resolve_import(TRAVEL, &SuffixVersionScheme::new(), &[]);
        assert_eq!(found, vec![padded]);
    }

    #[test]
    fn test_resolve_include_only_absolute() {
        let resolver = CatalogResolver::new();
        assert!(resolver.resolve_include(TRAVEL, "extra.json").is_none());
        assert!(resolver
            .resolve_include(TRAVEL, "https://m.test/extra.json")
            .is_some());
    }
}
