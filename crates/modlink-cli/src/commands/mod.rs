pub mod checksum;
pub mod resolve;
pub mod version;

use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory.
pub(crate) fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
