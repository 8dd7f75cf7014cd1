//! Extension-based source discovery below a directory.

use std::collections::BTreeSet;

use ::glob::{MatchOptions, Pattern, glob_with};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Collect the files below `directory` matching `**/*.<ext>` for any of
/// `extensions`, sorted and deduplicated.
///
/// Hidden files are not matched. Glob errors are logged and the offending
/// entries skipped.
pub(super) fn find_sources(directory: &Utf8Path, extensions: &[String]) -> Vec<Utf8PathBuf> {
    let escaped = Pattern::escape(directory.as_str());
    let mut found = BTreeSet::new();
    for extension in extensions {
        let pattern = format!("{escaped}/**/*.{extension}");
        let entries = match glob_with(&pattern, MATCH_OPTIONS) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%pattern, error = %err, "invalid source pattern");
                continue;
            }
        };
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => match Utf8PathBuf::from_path_buf(path) {
                    Ok(utf8) => {
                        found.insert(utf8);
                    }
                    Err(path) => {
                        warn!(path = %path.display(), "skipping source with non-UTF-8 path");
                    }
                },
                Ok(_) => {}
                Err(err) => warn!(error = %err, "skipping unreadable source"),
            }
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn touch(root: &Utf8Path, relative: &str) -> Utf8PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, "").expect("write");
        path
    }

    #[rstest]
    fn unions_extensions_in_path_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let stencil = touch(root, "app/App.stencil");
        let swift = touch(root, "app/Template.swift");
        let nested = touch(root, "lib/nested/Lib.swift");
        touch(root, "app/README.md");

        let found = find_sources(root, &["swift".to_owned(), "stencil".to_owned()]);
        assert_eq!(found, vec![stencil, swift, nested]);
    }

    #[rstest]
    fn ignores_hidden_files_and_directories_named_like_sources() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let visible = touch(root, "Helper.swift");
        touch(root, ".Hidden.swift");
        fs::create_dir_all(root.join("Folder.swift")).expect("mkdir");

        let found = find_sources(root, &["swift".to_owned()]);
        assert_eq!(found, vec![visible]);
    }

    #[rstest]
    fn directory_with_glob_metacharacters_is_matched_literally() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let odd = root.join("odd[dir]");
        let helper = touch(&odd, "Helper.swift");

        let found = find_sources(&odd, &["swift".to_owned()]);
        assert_eq!(found, vec![helper]);
    }
}
