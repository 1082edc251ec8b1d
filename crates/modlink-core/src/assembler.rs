//! Default model assembler.

use tracing::debug;

use crate::contracts::{CollaboratorError, ModelAssembler};
use crate::crc;
use crate::descriptor::{ModuleDescriptor, ModuleKind};
use crate::findings::{Finding, FindingCode, Findings};
use crate::location::ModuleLocation;
use crate::model::{ModelModule, ModuleKey, ResolvedModel};
use crate::staging::StagingArea;

/// Inserts staged modules into the model as [`ModelModule`]s.
///
/// Libraries go in before schemas, each group in location order, so the
/// outcome of a key collision does not depend on descent order.
#[derive(Debug, Clone)]
pub struct GraphAssembler {
    default_scheme: String,
}

impl GraphAssembler {
    /// Assembler recording `default_scheme` for modules that declare none.
    pub fn new(default_scheme: impl Into<String>) -> Self {
        Self {
            default_scheme: default_scheme.into(),
        }
    }

    fn to_module(&self, location: ModuleLocation, descriptor: ModuleDescriptor) -> ModelModule {
        let crc = match descriptor.kind() {
            ModuleKind::Library => Some(crc::compute(&descriptor)),
            ModuleKind::Schema => None,
        };
        ModelModule {
            key: ModuleKey::new(
                descriptor.namespace().unwrap_or_default(),
                descriptor.logical_name.clone(),
            ),
            kind: descriptor.kind(),
            location,
            version_scheme: descriptor
                .version_scheme_id
                .unwrap_or_else(|| self.default_scheme.clone()),
            includes: descriptor.includes,
            imports: descriptor.imports,
            crc,
        }
    }
}

impl ModelAssembler for GraphAssembler {
    fn assemble(
        &self,
        staging: StagingArea,
        model: &mut ResolvedModel,
    ) -> Result<Findings, CollaboratorError> {
        let mut findings = Findings::new();

        for (location, descriptor) in staging.into_descriptors() {
            if model.contains_location(&location) {
                continue;
            }
            let module = self.to_module(location, descriptor);
            if let Err(rejected) = model.insert(module) {
                let existing = model
                    .get(&rejected.key)
                    .map(|m| m.location.to_string())
                    .unwrap_or_default();
                debug!(
                    location = %rejected.location,
                    existing = %existing,
                    "duplicate module rejected"
                );
                findings.push(
                    Finding::new(FindingCode::DuplicateModule, rejected.location.as_str())
                        .with_param(rejected.key.namespace)
                        .with_param(rejected.key.name)
                        .with_param(rejected.location.as_str())
                        .with_param(existing),
                );
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Severity;

    fn loc(s: &str) -> ModuleLocation {
        ModuleLocation::parse(s).unwrap()
    }

    #[test]
    fn test_assembles_libraries_and_schemas() {
        let mut staging = StagingArea::new();
        staging.stage(
            loc("https://m.test/a.lib.json"),
            ModuleDescriptor::library("A", "urn:a"),
        );
        staging.stage(
            loc("https://m.test/s.json"),
            ModuleDescriptor::schema("s", Some("urn:a")),
        );

        let mut model = ResolvedModel::default();
        let findings = GraphAssembler::new("suffix")
            .assemble(staging, &mut model)
            .unwrap();

        assert!(findings.is_empty());
        assert_eq!(model.len(), 2);
        let library = model.get(&ModuleKey::new("urn:a", "A")).unwrap();
        assert_eq!(library.version_scheme, "suffix");
        assert!(library.crc.is_some());
        assert!(model.get(&ModuleKey::new("urn:a", "s")).unwrap().crc.is_none());
    }

    #[test]
    fn test_duplicate_key_is_a_warning() {
        let mut staging = StagingArea::new();
        staging.stage(
            loc("https://m.test/a1.lib.json"),
            ModuleDescriptor::library("A", "urn:a"),
        );
        staging.stage(
            loc("https://m.test/a2.lib.json"),
            ModuleDescriptor::library("A", "urn:a"),
        );

        let mut model = ResolvedModel::default();
        let findings = GraphAssembler::new("suffix")
            .assemble(staging, &mut model)
            .unwrap();

        assert_eq!(model.len(), 1);
        let dup = findings.with_code(FindingCode::DuplicateModule).next().unwrap();
        assert_eq!(dup.severity, Severity::Warning);
        assert_eq!(
            dup.params,
            vec![
                "urn:a",
                "A",
                "https://m.test/a2.lib.json",
                "https://m.test/a1.lib.json"
            ]
        );
    }

    #[test]
    fn test_already_assembled_location_is_skipped() {
        let mut model = ResolvedModel::default();
        let assembler = GraphAssembler::new("suffix");

        let mut first = StagingArea::new();
        first.stage(
            loc("https://m.test/a.lib.json"),
            ModuleDescriptor::library("A", "urn:a"),
        );
        assembler.assemble(first, &mut model).unwrap();

        let mut second = StagingArea::new();
        second.stage(
            loc("https://m.test/a.lib.json"),
            ModuleDescriptor::library("A", "urn:a"),
        );
        let findings = assembler.assemble(second, &mut model).unwrap();
        assert!(findings.is_empty());
        assert_eq!(model.len(), 1);
    }
}
