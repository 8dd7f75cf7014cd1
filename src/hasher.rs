//! Path hashing utilities.
//!
//! [`PathHasher`] computes a stable SHA-256 digest of an editing path. The
//! digest names the cache directory a project is generated into when no
//! destination is given, so repeated edits of one directory reuse one project.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use manifest_editor::hasher::PathHasher;
//!
//! let hash = PathHasher::hash(Utf8Path::new("/work/app"));
//! assert_eq!(hash.len(), 64);
//! assert_eq!(hash, PathHasher::hash(Utf8Path::new("/work/app")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};

/// Computes stable digests for editing paths.
pub struct PathHasher;

impl PathHasher {
    /// Calculate the lowercase hex digest of `path`.
    #[must_use]
    pub fn hash(path: &Utf8Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"path");
        for component in path.components() {
            Self::update_with_len(&mut hasher, component.as_str().as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Cache directory below `cache_root` reserved for `editing_path`.
    #[must_use]
    pub fn cache_directory(cache_root: &Utf8Path, editing_path: &Utf8Path) -> Utf8PathBuf {
        cache_root.join(Self::hash(editing_path))
    }

    fn update_with_len(hasher: &mut Sha256, bytes: &[u8]) {
        let len = bytes.len();
        hasher.update(format!("{len}:").as_bytes());
        hasher.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/work/app", "/work/app/")]
    #[case("/work/./app", "/work/app")]
    fn equivalent_spellings_share_a_hash(#[case] left: &str, #[case] right: &str) {
        assert_eq!(
            PathHasher::hash(Utf8Path::new(left)),
            PathHasher::hash(Utf8Path::new(right))
        );
    }

    #[rstest]
    #[case("/work/app", "/work/other")]
    #[case("/work/ab/c", "/work/a/bc")]
    fn distinct_paths_differ(#[case] left: &str, #[case] right: &str) {
        assert_ne!(
            PathHasher::hash(Utf8Path::new(left)),
            PathHasher::hash(Utf8Path::new(right))
        );
    }

    #[rstest]
    fn cache_directory_nests_under_root() {
        let dir = PathHasher::cache_directory(Utf8Path::new("/tmp/cache"), Utf8Path::new("/w"));
        assert_eq!(dir.parent(), Some(Utf8Path::new("/tmp/cache")));
        assert_eq!(dir.file_name().map(str::len), Some(64));
    }
}
