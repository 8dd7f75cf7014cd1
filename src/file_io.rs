//! Capability-based file helpers shared by the side-effect executor and the
//! project writer.
//!
//! Every absolute path is opened relative to its nearest existing ancestor
//! directory, so missing parents can be created through the same handle.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs as cap_fs};
use tempfile::NamedTempFile;

use crate::error::EditError;

/// What a write or removal did to the file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The file system was modified.
    Changed,
    /// The file system already matched the request.
    Unchanged,
}

fn derive_dir_and_relative(path: &Utf8Path) -> Result<(cap_fs::Dir, Utf8PathBuf), EditError> {
    if path.is_relative() {
        let dir = cap_fs::Dir::open_ambient_dir(".", ambient_authority())
            .map_err(|source| EditError::io("open working directory for", path, source))?;
        return Ok((dir, path.to_owned()));
    }

    let mut ancestors = path.ancestors();
    ancestors.next();
    let (base, dir) = ancestors
        .find_map(|candidate| {
            cap_fs::Dir::open_ambient_dir(candidate.as_str(), ambient_authority())
                .ok()
                .map(|dir| (candidate.to_owned(), dir))
        })
        .ok_or_else(|| {
            EditError::io(
                "find an existing ancestor of",
                path,
                io::Error::from(io::ErrorKind::NotFound),
            )
        })?;
    let relative = path
        .strip_prefix(&base)
        .map_err(|err| {
            EditError::io(
                "derive a relative path for",
                path,
                io::Error::new(io::ErrorKind::InvalidInput, err),
            )
        })?
        .to_owned();
    Ok((dir, relative))
}

fn create_parent(dir: &cap_fs::Dir, relative: &Utf8Path, path: &Utf8Path) -> Result<(), EditError> {
    if let Some(parent) = relative.parent().filter(|p| !p.as_str().is_empty()) {
        dir.create_dir_all(parent.as_str())
            .map_err(|source| EditError::io("create parent directory of", path, source))?;
    }
    Ok(())
}

fn read_existing(dir: &cap_fs::Dir, relative: &Utf8Path) -> Option<Vec<u8>> {
    dir.read(relative.as_str()).ok()
}

/// Write `contents` to `path` unless the file already holds exactly them.
///
/// Parent directories are created as needed.
pub(crate) fn write_if_changed(path: &Utf8Path, contents: &[u8]) -> Result<Outcome, EditError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    if read_existing(&dir, &relative).as_deref() == Some(contents) {
        return Ok(Outcome::Unchanged);
    }
    create_parent(&dir, &relative, path)?;
    let mut file = dir
        .create(relative.as_str())
        .map_err(|source| EditError::io("create", path, source))?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .and_then(|()| file.sync_all())
        .map_err(|source| EditError::io("write", path, source))?;
    Ok(Outcome::Changed)
}

/// Replace `path` with `contents` through a temporary sibling and a rename.
///
/// Readers never observe a partially written file. Nothing is written when
/// the file already holds `contents`.
pub(crate) fn replace_if_changed(path: &Utf8Path, contents: &[u8]) -> Result<Outcome, EditError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    if read_existing(&dir, &relative).as_deref() == Some(contents) {
        return Ok(Outcome::Unchanged);
    }
    create_parent(&dir, &relative, path)?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)
        .map_err(|source| EditError::io("create a temporary file for", path, source))?;
    {
        let handle = tmp.as_file_mut();
        handle
            .write_all(contents)
            .and_then(|()| handle.flush())
            .and_then(|()| handle.sync_all())
            .map_err(|source| EditError::io("write a temporary file for", path, source))?;
    }
    tmp.persist(path.as_std_path())
        .map_err(|err| EditError::io("replace", path, err.error))?;
    Ok(Outcome::Changed)
}

/// Remove the file at `path`; a missing file is not an error.
pub(crate) fn remove_file_if_present(path: &Utf8Path) -> Result<Outcome, EditError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    match dir.remove_file(relative.as_str()) {
        Ok(()) => Ok(Outcome::Changed),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Outcome::Unchanged),
        Err(source) => Err(EditError::io("remove", path, source)),
    }
}

/// Create `path` and any missing parents.
pub(crate) fn create_dir_all(path: &Utf8Path) -> Result<Outcome, EditError> {
    if path.is_dir() {
        return Ok(Outcome::Unchanged);
    }
    let (dir, relative) = derive_dir_and_relative(path)?;
    dir.create_dir_all(relative.as_str())
        .map_err(|source| EditError::io("create directory", path, source))?;
    Ok(Outcome::Changed)
}

/// Remove the directory at `path` when it has no entries.
pub(crate) fn remove_dir_if_empty(path: &Utf8Path) -> Result<Outcome, EditError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    let mut entries = dir
        .read_dir(relative.as_str())
        .map_err(|source| EditError::io("list directory", path, source))?;
    if entries.next().is_some() {
        return Ok(Outcome::Unchanged);
    }
    dir.remove_dir(relative.as_str())
        .map_err(|source| EditError::io("remove directory", path, source))?;
    Ok(Outcome::Changed)
}

/// Remove the directory at `path` with its contents; a missing directory is
/// not an error.
pub(crate) fn remove_dir_all_if_present(path: &Utf8Path) -> Result<Outcome, EditError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    match dir.remove_dir_all(relative.as_str()) {
        Ok(()) => Ok(Outcome::Changed),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Outcome::Unchanged),
        Err(source) => Err(EditError::io("remove directory", path, source)),
    }
}
