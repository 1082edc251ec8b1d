use std::fs;
use std::io;
use std::path::Path;

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Return the file name of `path` with the given compound extension removed.
///
/// `stem_without(Path::new("dir/Travel.lib.json"), ".lib.json")` is `Some("Travel")`.
/// Falls back to the plain file stem when the extension does not match.
#[must_use]
pub fn stem_without(path: &Path, extension: &str) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if let Some(stem) = name.strip_suffix(extension) {
        if !stem.is_empty() {
            return Some(stem.to_string());
        }
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.split('.').next().unwrap_or(s).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_to_string_lossy_valid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        file.flush().unwrap();

        let content = read_to_string_lossy(file.path()).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_read_to_string_lossy_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x80, 0x81])
            .unwrap();
        file.flush().unwrap();

        let content = read_to_string_lossy(file.path()).unwrap();
        assert!(content.starts_with("Hello"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_to_string_lossy_not_found() {
        assert!(read_to_string_lossy(Path::new("/nonexistent/file")).is_err());
    }

    #[test]
    fn test_stem_without() {
        assert_eq!(
            stem_without(Path::new("/m/Travel.lib.json"), ".lib.json").as_deref(),
            Some("Travel")
        );
        assert_eq!(
            stem_without(Path::new("/m/common.schema.json"), ".lib.json").as_deref(),
            Some("common")
        );
    }
}
