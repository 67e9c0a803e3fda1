//! Utility functions for directory management and file output
//!
//! Directories follow the XDG Base Directory specification:
//!
//! - Data: `~/.local/share/fwsim/` - `config.json`
//! - State: `~/.local/state/fwsim/` - `fwsim.log`

use directories::ProjectDirs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fwsim", "fwsim")
}

pub fn get_data_dir() -> Option<PathBuf> {
    project_dirs().map(|pd| pd.data_dir().to_path_buf())
}

pub fn get_state_dir() -> Option<PathBuf> {
    project_dirs().and_then(|pd| pd.state_dir().map(Path::to_path_buf))
}

/// Creates the state directory if needed and returns its path.
pub fn ensure_state_dir() -> std::io::Result<Option<PathBuf>> {
    let Some(dir) = get_state_dir() else {
        return Ok(None);
    };
    create_private_dir(&dir)?;
    Ok(Some(dir))
}

/// `mkdir -p` with mode 0o700 on Unix for every directory it creates.
pub fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

/// Writes `contents` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory, is synced,
/// then renamed over `path`. Readers see the old file or the new one, never a
/// partial write. On Unix the temporary file is created with mode 0o600.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                format!("Disk full: cannot write {}", path.display()),
            )
        } else {
            e.error
        }
    })?;
    Ok(())
}
