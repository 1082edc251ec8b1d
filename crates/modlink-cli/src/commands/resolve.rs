use miette::{miette, IntoDiagnostic, Result};
use modlink_core::version::OUTPUT_SCHEMA_VERSION;
use modlink_core::{
    CatalogResolver, EngineConfig, Finding, Findings, FsModuleLoader, ModelModule,
    ResolutionEngine,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::absolutize;

/// Inputs of `modlink resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub files: Vec<PathBuf>,
    pub namespaces: Vec<String>,
    pub catalogs: Vec<PathBuf>,
    pub indexes: Vec<PathBuf>,
    pub crc: bool,
    pub max_depth: Option<usize>,
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct ModuleJson {
    namespace: String,
    name: String,
    kind: &'static str,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    crc: Option<String>,
}

impl From<&ModelModule> for ModuleJson {
    fn from(module: &ModelModule) -> Self {
        Self {
            namespace: module.key.namespace.clone(),
            name: module.key.name.clone(),
            kind: module.kind.as_str(),
            location: module.location.to_string(),
            crc: module.crc.clone(),
        }
    }
}

#[derive(Serialize)]
struct FindingJson {
    severity: String,
    code: String,
    subject: String,
    params: Vec<String>,
    message: String,
}

impl From<&Finding> for FindingJson {
    fn from(finding: &Finding) -> Self {
        Self {
            severity: finding.severity.to_string(),
            code: finding.code.to_string(),
            subject: finding.subject.clone(),
            params: finding.params.clone(),
            message: finding.message(),
        }
    }
}

#[derive(Serialize)]
struct ResolveJsonResult {
    ok: bool,
    schema_version: u32,
    modules: Vec<ModuleJson>,
    findings: Vec<FindingJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

struct Report {
    modules: Vec<ModuleJson>,
    findings: Findings,
}

/// Run the resolve command.
///
/// Exits with status 1 when Error findings remain, and with status 2 in
/// JSON mode when resolution could not run at all.
pub fn run(cwd: &Path, args: &ResolveArgs, json: bool) -> Result<()> {
    let report = match resolve(cwd, args) {
        Ok(report) => report,
        Err(err) if json => {
            let result = ResolveJsonResult {
                ok: false,
                schema_version: OUTPUT_SCHEMA_VERSION,
                modules: Vec::new(),
                findings: Vec::new(),
                error: Some(err.to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
            std::process::exit(2);
        }
        Err(err) => return Err(err),
    };

    let ok = !report.findings.has_errors();
    if json {
        let result = ResolveJsonResult {
            ok,
            schema_version: OUTPUT_SCHEMA_VERSION,
            modules: report.modules,
            findings: report.findings.iter().map(FindingJson::from).collect(),
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        print_human(&report);
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve(cwd: &Path, args: &ResolveArgs) -> Result<Report> {
    if args.files.is_empty() && args.namespaces.is_empty() {
        return Err(miette!(
            "nothing to resolve: pass module files or --namespace"
        ));
    }

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(&absolutize(cwd, path)).into_diagnostic()?,
        None => EngineConfig::default(),
    };
    if args.crc {
        config = config.with_crc_enforcement(true);
    }
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }

    let mut resolver = CatalogResolver::new();
    for catalog in &args.catalogs {
        resolver
            .load_catalog(&absolutize(cwd, catalog))
            .into_diagnostic()?;
    }
    for dir in &args.indexes {
        resolver
            .index_directory(&absolutize(cwd, dir))
            .into_diagnostic()?;
    }

    let mut engine = ResolutionEngine::builder()
        .with_config(config)
        .with_loader(FsModuleLoader::new())
        .with_resolver(resolver)
        .build()
        .into_diagnostic()?;

    for file in &args.files {
        let path = absolutize(cwd, file);
        info!(file = %path.display(), "Resolving module");
        engine.load_module(path).into_diagnostic()?;
    }
    for namespace in &args.namespaces {
        info!(namespace = %namespace, "Resolving namespace");
        engine.load_namespace(namespace);
    }

    let mut findings = engine.cumulative_findings();
    findings.sort();
    Ok(Report {
        modules: engine.resolved_model().iter().map(ModuleJson::from).collect(),
        findings,
    })
}

fn print_human(report: &Report) {
    println!("Resolved {} module(s)", report.modules.len());
    for module in &report.modules {
        println!(
            "  {:<8} {} {}  ({})",
            module.kind, module.namespace, module.name, module.location
        );
    }

    let errors = report.findings.errors().count();
    let warnings = report.findings.warnings().count();
    if errors + warnings == 0 {
        return;
    }
    println!();
    println!("{errors} error(s), {warnings} warning(s)");
    for finding in &report.findings {
        println!("  {finding}");
    }
}
