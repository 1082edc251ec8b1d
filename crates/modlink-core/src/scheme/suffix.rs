//! Namespaces versioned by a trailing `/v<major>[_<minor>[_<patch>]]` segment.
//!
//! Examples:
//! - `http://example.com/ns/travel/v2` is 2.0.0
//! - `http://example.com/ns/travel/v02_01` is 2.1.0
//! - `http://example.com/ns/travel/v2_1_3` is 2.1.3

use semver::Version;

use super::VersionScheme;

/// Id under which [`SuffixVersionScheme`] registers itself.
pub const SUFFIX_SCHEME_ID: &str = "suffix";

/// Extension appended by [`SuffixVersionScheme::default_file_hint`].
pub const DEFAULT_HINT_EXTENSION: &str = ".lib.json";

/// Version scheme reading the version from the last path segment.
#[derive(Debug, Clone)]
pub struct SuffixVersionScheme {
    hint_extension: String,
}

impl Default for SuffixVersionScheme {
    fn default() -> Self {
        Self {
            hint_extension: DEFAULT_HINT_EXTENSION.to_string(),
        }
    }
}

/// A namespace split into its base and version.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionedNamespace<'a> {
    base: &'a str,
    version: Option<Version>,
    /// Digit width of the major component, to keep zero padding.
    width: usize,
}

impl<'a> VersionedNamespace<'a> {
    fn parse(namespace: &'a str) -> Self {
        let trimmed = namespace.trim().trim_end_matches('/');
        if let Some((base, segment)) = trimmed.rsplit_once('/') {
            if let Some(version) = parse_segment(segment) {
                let width = segment[1..].split('_').next().map_or(1, str::len);
                return Self {
                    base,
                    version: Some(version),
                    width,
                };
            }
        }
        Self {
            base: trimmed,
            version: None,
            width: 1,
        }
    }

    fn render(&self, version: &Version) -> String {
        let width = self.width;
        let segment = if version.patch > 0 {
            format!(
                "v{:0width$}_{:0width$}_{:0width$}",
                version.major, version.minor, version.patch
            )
        } else if version.minor > 0 {
            format!("v{:0width$}_{:0width$}", version.major, version.minor)
        } else {
            format!("v{:0width$}", version.major)
        };
        format!("{}/{segment}", self.base)
    }
}

/// Parse `v1`, `v01_02`, `v1_2_3` into a version.
fn parse_segment(segment: &str) -> Option<Version> {
    let digits = segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'))?;
    let parts: Vec<&str> = digits.split('_').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

impl SuffixVersionScheme {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different extension for default file hints.
    #[must_use]
    pub fn with_hint_extension(mut self, extension: impl Into<String>) -> Self {
        self.hint_extension = extension.into();
        self
    }

    /// The version encoded in `namespace`, if any.
    #[must_use]
    pub fn version_of(&self, namespace: &str) -> Option<Version> {
        VersionedNamespace::parse(namespace).version
    }

    /// `namespace` without its version segment.
    #[must_use]
    pub fn base_namespace<'a>(&self, namespace: &'a str) -> &'a str {
        VersionedNamespace::parse(namespace).base
    }
}

impl VersionScheme for SuffixVersionScheme {
    fn id(&self) -> &str {
        SUFFIX_SCHEME_ID
    }

    fn major_version_chain<'s>(
        &'s self,
        namespace: &'s str,
    ) -> Box<dyn Iterator<Item = String> + 's> {
        let head = std::iter::once(namespace.to_string());
        let parsed = VersionedNamespace::parse(namespace);
        let Some(current) = parsed.version.clone() else {
            return Box::new(head);
        };

        let minor_base = (current.patch > 0)
            .then(|| parsed.render(&Version::new(current.major, current.minor, 0)));
        let major = current.major;
        let earlier = (0..current.minor)
            .rev()
            .map(move |minor| parsed.render(&Version::new(major, minor, 0)));
        Box::new(head.chain(minor_base).chain(earlier))
    }

    fn is_allowed_variation(&self, expected: &str, actual: &str) -> bool {
        if expected == actual {
            return true;
        }
        let expected = VersionedNamespace::parse(expected);
        let actual = VersionedNamespace::parse(actual);
        if expected.base != actual.base {
            return false;
        }

        // An unversioned side takes on the other side's explicit version.
        match (expected.version, actual.version) {
            (Some(e), Some(a)) => e == a,
            _ => true,
        }
    }

    fn default_file_hint(&self, namespace: &str, logical_name: &str) -> String {
        let version = VersionedNamespace::parse(namespace)
            .version
            .unwrap_or_else(|| Version::new(0, 0, 0));
        format!(
            "{logical_name}_{}_{}_{}{}",
            version.major, version.minor, version.patch, self.hint_extension
        )
    }
}
