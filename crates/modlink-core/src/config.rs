use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Default bound on include/import nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default number of earlier versions probed when backfilling one library.
pub const DEFAULT_BACKFILL_LIMIT: usize = 32;

/// Runtime configuration for a [`ResolutionEngine`](crate::ResolutionEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Check library checksums and reject modules that fail.
    pub enforce_crc: bool,

    /// Maximum nesting depth of includes/imports below the root.
    pub max_depth: usize,

    /// Load earlier minor versions of every staged library's namespace.
    pub backfill_versions: bool,

    /// Maximum number of earlier versions probed per staged library.
    pub backfill_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enforce_crc: false,
            max_depth: DEFAULT_MAX_DEPTH,
            backfill_versions: true,
            backfill_limit: DEFAULT_BACKFILL_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Enable or disable checksum enforcement.
    #[must_use]
    pub fn with_crc_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_crc = enforce;
        self
    }

    /// Set the maximum descent depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable version-chain backfill.
    #[must_use]
    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill_versions = backfill;
        self
    }

    /// Bound the earlier versions probed per library.
    #[must_use]
    pub fn with_backfill_limit(mut self, limit: usize) -> Self {
        self.backfill_limit = limit;
        self
    }
}
