//! Version-chain backfill.
//!
//! A consumer only imports the newest minor version it knows, but types
//! from earlier minors of the same major must be reachable too. After a
//! library is staged, its earlier versions are loaded as synthesized
//! imports.

use tracing::debug;

use super::descent::{Descent, Edge};
use crate::location::ModuleLocation;
use crate::scheme::VersionScheme;

impl Descent<'_> {
    /// Walk the major-version chain of `namespace` from the newest earlier
    /// version down, probing at most `backfill_limit` versions.
    ///
    /// Stops at the first version already present, or at the first one that
    /// gets staged; that version's own backfill reaches further back.
    /// Versions that cannot be located or loaded are skipped.
    pub(super) fn backfill(
        &mut self,
        library: &ModuleLocation,
        namespace: &str,
        logical_name: &str,
        scheme: &dyn VersionScheme,
        depth: usize,
    ) {
        let limit = self.config.backfill_limit;
        for candidate in scheme.major_version_chain(namespace).skip(1).take(limit) {
            if self.staging.contains_namespace(&candidate)
                || self.model.contains_namespace(&candidate)
            {
                debug!(namespace, candidate = %candidate, "Backfill reached a present version");
                return;
            }

            let hint = scheme.default_file_hint(&candidate, logical_name);
            let hints: Vec<String> = library
                .join(&hint)
                .map(|location| vec![location.to_string()])
                .unwrap_or_default();
            let locations = self.resolver.resolve_import(&candidate, scheme, &hints);
            if locations.is_empty() {
                debug!(namespace, candidate = %candidate, "Backfill candidate unresolved");
                continue;
            }

            debug!(
                namespace,
                candidate = %candidate,
                count = locations.len(),
                "Backfilling earlier version"
            );
            for location in &locations {
                self.visit(location, Edge::import(&candidate), depth);
            }
            let landed = locations.iter().any(|location| {
                self.staging.is_staged(location) || self.model.contains_location(location)
            });
            if landed {
                return;
            }
            debug!(namespace, candidate = %candidate, "Backfill candidate failed to load");
        }
    }
}
