//! Crate and output-format versions.

use serde::Serialize;
use std::fmt;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the JSON printed by `modlink --json`. Raised whenever the
/// module or finding objects change shape incompatibly.
pub const OUTPUT_SCHEMA_VERSION: u32 = 1;

/// What `modlink version` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: VERSION,
            schema_version: OUTPUT_SCHEMA_VERSION,
            git_hash: option_env!("MODLINK_BUILD_GIT_HASH"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modlink {}", self.version)?;
        if let Some(hash) = self.git_hash {
            write!(f, " ({hash})")?;
        }
        Ok(())
    }
}

/// One-line version banner.
#[must_use]
pub fn version_string() -> String {
    VersionInfo::current().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_names_crate_and_version() {
        let banner = version_string();
        assert!(banner.starts_with("modlink "));
        assert!(banner.contains(VERSION));
    }

    #[test]
    fn test_banner_appends_git_hash() {
        let info = VersionInfo {
            version: "1.2.3",
            schema_version: 1,
            git_hash: Some("abc123"),
        };
        assert_eq!(info.to_string(), "modlink 1.2.3 (abc123)");
    }

    #[test]
    fn test_json_omits_missing_hash() {
        let info = VersionInfo {
            version: "1.2.3",
            schema_version: OUTPUT_SCHEMA_VERSION,
            git_hash: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["version"], "1.2.3");
        assert_eq!(json["schema_version"], OUTPUT_SCHEMA_VERSION);
        assert!(json.get("git_hash").is_none());
    }
}
