//! Project root detection.

use camino::{Utf8Path, Utf8PathBuf};

/// Marker entry identifying a version-control checkout root.
const VCS_MARKER: &str = ".git";

/// Return the nearest ancestor of `start` (inclusive) that looks like a
/// project root.
///
/// A directory qualifies when it contains the `tooling` directory or a `.git`
/// entry. When no ancestor qualifies, `start` itself is the root.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use manifest_editor::locator::locate_root;
///
/// let dir = tempfile::tempdir().expect("tempdir");
/// let root = Utf8Path::from_path(dir.path()).expect("utf8");
/// std::fs::create_dir_all(root.join("Tooling")).expect("mkdir");
/// std::fs::create_dir_all(root.join("App/Sources")).expect("mkdir");
///
/// assert_eq!(locate_root(&root.join("App/Sources"), Utf8Path::new("Tooling")), root);
/// ```
#[must_use]
pub fn locate_root(start: &Utf8Path, tooling: &Utf8Path) -> Utf8PathBuf {
    start
        .ancestors()
        .find(|candidate| candidate.join(tooling).is_dir() || candidate.join(VCS_MARKER).exists())
        .map_or_else(|| start.to_owned(), Utf8Path::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        (dir, path)
    }

    #[rstest]
    fn falls_back_to_start_without_markers() {
        let (_guard, root) = utf8_tempdir();
        let start = root.join("a/b");
        fs::create_dir_all(&start).expect("mkdir");
        assert_eq!(locate_root(&start, Utf8Path::new("Tooling")), start);
    }

    #[rstest]
    #[case("Tooling")]
    #[case(".git")]
    fn finds_nearest_marked_ancestor(#[case] marker: &str) {
        let (_guard, root) = utf8_tempdir();
        let project = root.join("project");
        let start = project.join("Modules/Core");
        fs::create_dir_all(&start).expect("mkdir");
        fs::create_dir_all(project.join(marker)).expect("marker");
        assert_eq!(locate_root(&start, Utf8Path::new("Tooling")), project);
    }

    #[rstest]
    fn prefers_the_closest_root() {
        let (_guard, root) = utf8_tempdir();
        let inner = root.join("outer/inner");
        fs::create_dir_all(root.join("outer/Tooling")).expect("outer marker");
        fs::create_dir_all(inner.join("Tooling")).expect("inner marker");
        assert_eq!(locate_root(&inner, Utf8Path::new("Tooling")), inner);
    }
}
