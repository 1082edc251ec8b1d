use miette::{miette, IntoDiagnostic, Result};
use modlink_core::crc::{self, CrcCheck};
use modlink_core::version::OUTPUT_SCHEMA_VERSION;
use modlink_core::{FsModuleLoader, InputSource, ModuleArtifact, ModuleLoader};
use serde::Serialize;
use std::path::Path;

use super::absolutize;

#[derive(Serialize)]
struct ChecksumJson {
    schema_version: u32,
    file: String,
    identity: String,
    crc: String,
    declared: Option<String>,
    /// `None` when the document declares no checksum.
    matches: Option<bool>,
}

/// Print the checksum a library document should declare.
pub fn run(cwd: &Path, file: &Path, json: bool) -> Result<()> {
    let path = absolutize(cwd, file);
    let location = InputSource::File(path.clone())
        .to_location()
        .into_diagnostic()?;
    let outcome = FsModuleLoader::new()
        .load_library(&location)
        .into_diagnostic()?;

    let Some(descriptor) = outcome.descriptor else {
        let reason = outcome
            .findings
            .iter()
            .next()
            .map(|f| f.message())
            .unwrap_or_default();
        return Err(miette!(
            "{} is not a valid module document: {reason}",
            path.display()
        ));
    };

    let computed = crc::compute(&descriptor);
    let declared = match &descriptor.artifact {
        ModuleArtifact::Library(library) => library.declared_crc.clone(),
        ModuleArtifact::Schema(_) => None,
    };
    let matches = declared
        .as_ref()
        .map(|_| matches!(crc::verify(&descriptor), CrcCheck::Valid));

    if json {
        let out = ChecksumJson {
            schema_version: OUTPUT_SCHEMA_VERSION,
            file: path.display().to_string(),
            identity: descriptor.identity(),
            crc: computed,
            declared,
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
    } else {
        println!("{computed}");
        if matches == Some(false) {
            eprintln!(
                "warning: {} declares checksum {}",
                descriptor.identity(),
                declared.unwrap_or_default()
            );
        }
    }
    Ok(())
}
