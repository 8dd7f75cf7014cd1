//! Path resolution for the runner.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

use crate::cli::Cli;
use crate::hasher::PathHasher;

/// Directory below the system temporary directory holding cached projects.
const CACHE_DIRECTORY: &str = "manifest-editor";

/// Convert a host path to UTF-8, naming `what` in the error.
pub(super) fn utf8(path: std::path::PathBuf, what: &str) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("{what} is not valid UTF-8: {}", path.display()))
}

/// Make `path` absolute against `cwd` and drop `.` components.
#[must_use]
pub(super) fn absolute(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let joined = if path.is_absolute() {
        path.to_owned()
    } else {
        cwd.join(path)
    };
    joined.components().collect()
}

/// The directory to edit.
pub(super) fn editing_path(cli: &Cli, cwd: &Utf8Path) -> Result<Utf8PathBuf> {
    let path = cli
        .path
        .as_deref()
        .map_or_else(|| cwd.to_owned(), |given| absolute(cwd, given));
    if !path.is_dir() {
        return Err(anyhow!("{path} is not a directory"));
    }
    Ok(path)
}

/// The directory the project is generated into.
///
/// `--permanent` selects the editing path, `--destination` an explicit
/// directory. Otherwise a cache directory unique to the editing path is used
/// so repeated edits update one project.
pub(super) fn destination(
    cli: &Cli,
    cwd: &Utf8Path,
    editing_path: &Utf8Path,
) -> Result<Utf8PathBuf> {
    if cli.permanent {
        return Ok(editing_path.to_owned());
    }
    if let Some(destination) = &cli.destination {
        return Ok(absolute(cwd, destination));
    }
    let cache_root = utf8(std::env::temp_dir(), "temporary directory")
        .context("resolving the project cache")?
        .join(CACHE_DIRECTORY);
    Ok(PathHasher::cache_directory(&cache_root, editing_path))
}
