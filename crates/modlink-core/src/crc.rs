//! Library checksums.
//!
//! A library may declare a checksum over its semantic content. The checksum
//! is the BLAKE3 digest of the canonical JSON of that content; `serde_json`
//! maps are key-sorted, so the encoding is stable.

use modlink_util::hash::{blake3_bytes, digest_matches};
use serde_json::json;

use crate::descriptor::{ModuleArtifact, ModuleDescriptor};

/// Outcome of checking a descriptor's checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrcCheck {
    /// Declared checksum matches.
    Valid,
    /// Nothing to check: a schema, or a library that needs no checksum and
    /// declares none.
    NotRequired,
    /// Required checksum is absent.
    Missing,
    /// Declared checksum differs from the computed one.
    Invalid { declared: String, computed: String },
}

/// Compute the checksum of a descriptor's semantic content.
///
/// The declared checksum itself and the library status are not covered.
#[must_use]
pub fn compute(descriptor: &ModuleDescriptor) -> String {
    let canonical = json!({
        "name": descriptor.logical_name,
        "namespace": descriptor.namespace(),
        "version_scheme": descriptor.version_scheme_id,
        "includes": descriptor.includes,
        "imports": descriptor.imports,
        "content": descriptor.artifact.content(),
    });
    blake3_bytes(canonical.to_string().as_bytes())
}

/// Check a descriptor's declared checksum.
#[must_use]
pub fn verify(descriptor: &ModuleDescriptor) -> CrcCheck {
    let ModuleArtifact::Library(library) = &descriptor.artifact else {
        return CrcCheck::NotRequired;
    };

    match library.declared_crc.as_deref().map(str::trim) {
        Some(declared) if !declared.is_empty() => {
            let computed = compute(descriptor);
            if digest_matches(declared, &computed) {
                CrcCheck::Valid
            } else {
                CrcCheck::Invalid {
                    declared: declared.to_string(),
                    computed,
                }
            }
        }
        _ if library.status.requires_crc() => CrcCheck::Missing,
        _ => CrcCheck::NotRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{LibraryStatus, NamespaceImport};

    fn library() -> ModuleDescriptor {
        ModuleDescriptor::library("Travel", "http://example.com/ns/travel/v1")
            .with_import(NamespaceImport::new("http://example.com/ns/common/v1", "c"))
            .with_content(json!({"types": ["Trip", "Leg"]}))
    }

    #[test]
    fn test_compute_is_stable() {
        assert_eq!(compute(&library()), compute(&library()));
    }

    #[test]
    fn test_compute_ignores_declared_crc_and_status() {
        let plain = library();
        let declared =
            library().with_library_meta(LibraryStatus::Final, Some("abc".to_string()));
        assert_eq!(compute(&plain), compute(&declared));
    }

    #[test]
    fn test_compute_covers_content() {
        let other = library().with_content(json!({"types": ["Trip"]}));
        assert_ne!(compute(&library()), compute(&other));
    }

    #[test]
    fn test_verify_valid() {
        let crc = compute(&library());
        let descriptor = library().with_library_meta(LibraryStatus::Final, Some(crc));
        assert_eq!(verify(&descriptor), CrcCheck::Valid);
    }

    #[test]
    fn test_verify_invalid() {
        let descriptor =
            library().with_library_meta(LibraryStatus::Draft, Some("deadbeef".to_string()));
        assert!(matches!(verify(&descriptor), CrcCheck::Invalid { .. }));
    }

    #[test]
    fn test_verify_missing_only_when_required() {
        let draft = library();
        assert_eq!(verify(&draft), CrcCheck::NotRequired);
        let final_lib = library().with_library_meta(LibraryStatus::Final, None);
        assert_eq!(verify(&final_lib), CrcCheck::Missing);
    }

    #[test]
    fn test_schemas_are_not_checked() {
        let schema = ModuleDescriptor::schema("common", Some("urn:common"));
        assert_eq!(verify(&schema), CrcCheck::NotRequired);
    }
}
