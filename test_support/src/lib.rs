//! Test utilities for the manifest editor.
//!
//! [`EditingTree`] lays out a throwaway directory with an editing path, a
//! description framework and a destination, and offers helpers to populate
//! it with manifests, helpers and templates. [`snapshot`] captures every file
//! below a directory so tests can compare disk state between runs.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Name of the framework bundle created by [`EditingTree::new`].
pub const FRAMEWORK_NAME: &str = "ProjectDescription.framework";

/// A temporary editing session layout.
///
/// ```text
/// <base>/app/                                  editing path
/// <base>/lib/ProjectDescription.framework/     description framework
/// <base>/out/                                  destination (not created)
/// ```
#[derive(Debug)]
pub struct EditingTree {
    _dir: TempDir,
    base: Utf8PathBuf,
}

impl EditingTree {
    /// Create the layout with an empty editing path and a framework bundle.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow!("temp dir is not UTF-8: {}", p.display()))?;
        let tree = Self { _dir: dir, base };
        fs::create_dir_all(tree.editing_path()).context("create editing path")?;
        fs::create_dir_all(tree.framework_path()).context("create framework")?;
        Ok(tree)
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// The directory being edited.
    #[must_use]
    pub fn editing_path(&self) -> Utf8PathBuf {
        self.base.join("app")
    }

    /// The description framework bundle.
    #[must_use]
    pub fn framework_path(&self) -> Utf8PathBuf {
        self.base.join("lib").join(FRAMEWORK_NAME)
    }

    /// Where projects are generated.
    #[must_use]
    pub fn destination(&self) -> Utf8PathBuf {
        self.base.join("out")
    }

    /// Write `contents` to `relative` below the editing path.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its parents cannot be created.
    pub fn file(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.editing_path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Add a manifest at `relative`, for example `App/Project.swift`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn manifest(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.file(relative, "let project = Project(name: \"App\")\n")
    }

    /// Add a helper source below `Tooling/Helpers`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn helper(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.file(
            &format!("Tooling/Helpers/{relative}"),
            "public extension Project {}\n",
        )
    }

    /// Add a template file below `Tooling/Templates`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn template(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.file(&format!("Tooling/Templates/{relative}"), "{{ name }}\n")
    }

    /// Write a settings file pointing at this tree's framework and return
    /// its path. `extra` is appended verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn settings_file(&self, extra: &str) -> Result<Utf8PathBuf> {
        let path = self.base.join("editor.yml");
        let yaml = format!("framework:\n  path: {}\n{extra}", self.framework_path());
        fs::write(&path, yaml).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}

/// Every file below `dir` keyed by its path relative to `dir`.
///
/// A missing directory yields an empty map.
///
/// # Errors
///
/// Returns an error when a file cannot be read.
pub fn snapshot(dir: &Utf8Path) -> Result<BTreeMap<Utf8PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    if !dir.exists() {
        return Ok(files);
    }
    for item in WalkDir::new(dir).sort_by_file_name() {
        let entry = item.with_context(|| format!("walk {dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| anyhow!("non UTF-8 path: {}", entry.path().display()))?;
        let relative = path.strip_prefix(dir).context("strip snapshot root")?;
        let contents = fs::read(path).with_context(|| format!("read {path}"))?;
        files.insert(relative.to_owned(), contents);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::ensure;
    use rstest::rstest;

    #[rstest]
    fn tree_starts_with_editing_path_and_framework() -> Result<()> {
        let tree = EditingTree::new()?;
        ensure!(tree.editing_path().is_dir());
        ensure!(tree.framework_path().is_dir());
        ensure!(!tree.destination().exists());
        Ok(())
    }

    #[rstest]
    fn snapshot_lists_files_relative_to_root() -> Result<()> {
        let tree = EditingTree::new()?;
        tree.manifest("Project.swift")?;
        tree.helper("nested/A.swift")?;
        let files = snapshot(&tree.editing_path())?;
        let keys: Vec<&str> = files.keys().map(Utf8PathBuf::as_str).collect();
        ensure!(
            keys == ["Project.swift", "Tooling/Helpers/nested/A.swift"],
            "{keys:?}"
        );
        Ok(())
    }
}
