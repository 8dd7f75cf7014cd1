//! Recursive manifest discovery.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories excluded from manifest discovery.
pub(super) struct SkipRules<'a> {
    names: &'a [String],
    paths: &'a [&'a Utf8Path],
}

impl<'a> SkipRules<'a> {
    pub(super) const fn new(names: &'a [String], paths: &'a [&'a Utf8Path]) -> Self {
        Self { names, paths }
    }

    fn should_visit(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.names.iter().any(|skip| skip.as_str() == name) {
            return false;
        }
        !self
            .paths
            .iter()
            .any(|excluded| excluded.as_std_path() == entry.path())
    }
}

/// Collect every file below `root` whose name is one of `names`.
///
/// Traversal is sorted by file name so the result does not depend on the
/// platform's directory iteration order. Unreadable entries are skipped.
pub(super) fn find_manifests(
    root: &Utf8Path,
    names: &[String],
    skip: &SkipRules<'_>,
) -> Vec<Utf8PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| skip.should_visit(entry));

    let mut manifests = Vec::new();
    for walk_entry in walker {
        let entry = match walk_entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry during manifest discovery");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !names.iter().any(|name| name.as_str() == file_name) {
            continue;
        }
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => manifests.push(path),
            Err(path) => warn!(path = %path.display(), "skipping manifest with non-UTF-8 path"),
        }
    }
    manifests.sort();
    manifests.dedup();
    manifests
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn names() -> Vec<String> {
        vec!["Project.swift".to_owned(), "Workspace.swift".to_owned()]
    }

    fn touch(root: &Utf8Path, relative: &str) -> Utf8PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, "").expect("write");
        path
    }

    #[rstest]
    fn finds_manifests_at_any_depth_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let nested = touch(root, "Modules/Feature/Project.swift");
        let top = touch(root, "Project.swift");
        let workspace = touch(root, "Workspace.swift");
        touch(root, "Modules/Feature/Sources/Main.swift");

        let found = find_manifests(root, &names(), &SkipRules::new(&[], &[]));
        assert_eq!(found, vec![nested, top, workspace]);
    }

    #[rstest]
    fn skips_named_and_excluded_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let kept = touch(root, "App/Project.swift");
        touch(root, ".build/checkouts/Dep/Project.swift");
        touch(root, "Tooling/Helpers/Project.swift");

        let skip_names = vec![".build".to_owned()];
        let helpers = root.join("Tooling/Helpers");
        let excluded = [helpers.as_path()];
        let found = find_manifests(root, &names(), &SkipRules::new(&skip_names, &excluded));
        assert_eq!(found, vec![kept]);
    }

    #[rstest]
    fn missing_root_yields_nothing() {
        let found = find_manifests(
            Utf8Path::new("/definitely/not/here"),
            &names(),
            &SkipRules::new(&[], &[]),
        );
        assert!(found.is_empty());
    }
}
