//! Atomic artifact writing.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use aw_site::BuildError;
use tempfile::Builder;

/// Write `contents` to `path` so readers never see a partial file.
///
/// The HTML is written to a temporary file in the target directory and
/// renamed into place. Missing parent directories are created. On failure
/// the temporary file is removed and any existing artifact is untouched.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), BuildError> {
    atomic_write(path, contents).map_err(|source| BuildError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(())
}

fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = Builder::new().prefix(".atomwiki").tempfile_in(parent)?;
    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path).map_or(0o644, |m| m.permissions().mode());
        let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode));
    }

    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}
