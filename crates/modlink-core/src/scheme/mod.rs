//! Version schemes.
//!
//! A version scheme knows how a namespace string encodes its version and
//! how to enumerate the earlier versions a consumer implicitly depends on.

mod suffix;

pub use suffix::{SuffixVersionScheme, DEFAULT_HINT_EXTENSION, SUFFIX_SCHEME_ID};

use std::fmt;

/// Strategy for interpreting versioned namespaces.
pub trait VersionScheme: Send + Sync + fmt::Debug {
    /// Identifier modules use to select this scheme.
    fn id(&self) -> &str;

    /// The namespace followed by every earlier version in its major-version
    /// chain, newest first. The first item is always `namespace` itself.
    ///
    /// The chain is produced lazily; its length comes from the document, so
    /// callers bound how much of it they consume.
    fn major_version_chain<'s>(
        &'s self,
        namespace: &'s str,
    ) -> Box<dyn Iterator<Item = String> + 's>;

    /// Whether `actual` may stand in for `expected`.
    fn is_allowed_variation(&self, expected: &str, actual: &str) -> bool;

    /// Resource name a module called `logical_name` is expected to use for
    /// the version encoded in `namespace`.
    fn default_file_hint(&self, namespace: &str, logical_name: &str) -> String;
}
