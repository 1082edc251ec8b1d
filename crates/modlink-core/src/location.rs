//! Module locations and caller-supplied input sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::Error;

/// An absolute, comparable resource identifier for one module.
///
/// Locations are the dedup key of a resolution pass: two edges that resolve
/// to the same location share a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleLocation(Url);

impl ModuleLocation {
    /// Parse an absolute URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    /// Build a `file:` location from an absolute path.
    #[must_use]
    pub fn from_file_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(Self)
    }

    /// Resolve `reference` relative to this location.
    ///
    /// Absolute references replace this location entirely.
    #[must_use]
    pub fn join(&self, reference: &str) -> Option<Self> {
        if reference.trim().is_empty() {
            return None;
        }
        self.0.join(reference).ok().map(Self)
    }

    /// The filesystem path behind a `file:` location.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.0.scheme() == "file" {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    /// URL scheme (`file`, `https`, ...).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for ModuleLocation {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A root module handed to the engine by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// An already-resolved location.
    Location(ModuleLocation),
    /// A file on disk; relative paths are resolved against the process
    /// working directory.
    File(PathBuf),
}

impl InputSource {
    /// Turn the input into a location.
    pub fn to_location(&self) -> Result<ModuleLocation, Error> {
        match self {
            Self::Location(location) => Ok(location.clone()),
            Self::File(path) => {
                let absolute = if path.is_absolute() {
                    path.clone()
                } else {
                    std::env::current_dir()?.join(path)
                };
                ModuleLocation::from_file_path(&absolute)
                    .ok_or_else(|| Error::InvalidInput { path: path.clone() })
            }
        }
    }
}

impl From<ModuleLocation> for InputSource {
    fn from(location: ModuleLocation) -> Self {
        Self::Location(location)
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_relative() {
        let base = ModuleLocation::parse("https://modules.test/travel/Travel.lib.json").unwrap();
        let joined = base.join("common/Common.lib.json").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://modules.test/travel/common/Common.lib.json"
        );
    }

    #[test]
    fn test_join_blank_is_none() {
        let base = ModuleLocation::parse("https://modules.test/a.lib.json").unwrap();
        assert!(base.join("  ").is_none());
    }

    #[test]
    fn test_join_absolute_replaces() {
        let base = ModuleLocation::parse("https://modules.test/a.lib.json").unwrap();
        let joined = base.join("https://other.test/b.lib.json").unwrap();
        assert_eq!(joined.as_str(), "https://other.test/b.lib.json");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Travel.lib.json");
        let location = ModuleLocation::from_file_path(&path).unwrap();
        assert_eq!(location.scheme(), "file");
        assert_eq!(location.to_file_path().unwrap(), path);
    }

    #[test]
    fn test_non_file_has_no_path() {
        let location = ModuleLocation::parse("https://modules.test/a.lib.json").unwrap();
        assert!(location.to_file_path().is_none());
    }

    #[test]
    fn test_ordering_is_by_url() {
        let a = ModuleLocation::parse("https://modules.test/a").unwrap();
        let b = ModuleLocation::parse("https://modules.test/b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serializes_as_url_string() {
        let location = ModuleLocation::parse("https://modules.test/a.lib.json").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, r#""https://modules.test/a.lib.json""#);
        let back: ModuleLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, location);
    }
}
