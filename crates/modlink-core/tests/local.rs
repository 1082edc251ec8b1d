//! End-to-end resolution over module documents on disk.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use modlink_core::{CatalogResolver, FindingCode, FsModuleLoader, ModuleKey, ResolutionEngine};

const ROOT_NS: &str = "http://example.com/ns/booking/v1";
const TRAVEL: &str = "http://example.com/ns/travel";

fn write(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn engine(resolver: CatalogResolver) -> ResolutionEngine {
    ResolutionEngine::builder()
        .with_loader(FsModuleLoader::new())
        .with_resolver(resolver)
        .build()
        .unwrap()
}

#[test]
fn test_hints_includes_and_backfill_on_disk() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Booking.lib.json",
        &format!(
            r#"{{
                "namespace": "{ROOT_NS}",
                "includes": ["common.json"],
                "imports": [{{
                    "namespace": "{TRAVEL}/v1_1",
                    "prefix": "t",
                    "file_hints": ["travel/Travel_1_1_0.lib.json"]
                }}]
            }}"#
        ),
    );
    write(dir.path(), "common.json", r#"{"content": {"types": ["Money"]}}"#);
    write(
        dir.path(),
        "travel/Travel_1_1_0.lib.json",
        &format!(r#"{{"name": "Travel", "namespace": "{TRAVEL}/v1_1"}}"#),
    );
    write(
        dir.path(),
        "travel/Travel_1_0_0.lib.json",
        &format!(r#"{{"name": "Travel", "namespace": "{TRAVEL}/v1"}}"#),
    );

    let mut engine = engine(CatalogResolver::new());
    let findings = engine
        .load_module(dir.path().join("Booking.lib.json"))
        .unwrap();

    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    let model = engine.resolved_model();
    assert_eq!(model.len(), 4);
    assert!(model.contains_key(&ModuleKey::new(ROOT_NS, "common")));
    assert!(model.contains_key(&ModuleKey::new(format!("{TRAVEL}/v1"), "Travel")));
}

#[test]
fn test_indexed_directory_supplies_missing_namespace() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app/App.lib.json",
        &format!(
            r#"{{"namespace": "{ROOT_NS}", "imports": [{{"namespace": "{TRAVEL}/v2", "prefix": "t"}}]}}"#
        ),
    );
    write(
        dir.path(),
        "repo/Travel.lib.json",
        &format!(r#"{{"namespace": "{TRAVEL}/v2"}}"#),
    );

    let mut engine = engine(CatalogResolver::new());
    let findings = engine
        .load_module(dir.path().join("app/App.lib.json"))
        .unwrap();
    assert_eq!(findings.count(FindingCode::UnresolvedLibraryNamespace), 1);

    let mut resolver = CatalogResolver::new();
    resolver.index_directory(&dir.path().join("repo")).unwrap();
    let mut engine = self::engine(resolver);
    let findings = engine
        .load_module(dir.path().join("app/App.lib.json"))
        .unwrap();
    assert!(findings.is_empty());
    assert!(engine
        .resolved_model()
        .contains_namespace(&format!("{TRAVEL}/v2")));
}

#[test]
fn test_parse_error_in_dependency() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "App.lib.json",
        &format!(r#"{{"namespace": "{ROOT_NS}", "includes": ["broken.json"]}}"#),
    );
    write(dir.path(), "broken.json", "{ not json");

    let mut engine = engine(CatalogResolver::new());
    let findings = engine.load_module(dir.path().join("App.lib.json")).unwrap();

    assert_eq!(findings.count(FindingCode::ModuleParseError), 1);
    assert_eq!(engine.resolved_model().len(), 1);
}
