//! Deferred file-system mutations and their executor.
//!
//! Project mappers never touch the disk; they describe what must exist with
//! [`SideEffect`] values. [`SideEffectExecutor`] applies them in order. Each
//! descriptor states the desired end state rather than an action, so applying
//! the same descriptor twice leaves the disk as applying it once did.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::error::EditError;
use crate::file_io::{self, Outcome};

/// Desired state of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    /// The file exists with exactly these bytes.
    Present(Vec<u8>),
    /// The file does not exist.
    Absent,
}

/// Desired state of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    /// The directory exists.
    Present,
    /// The directory and everything below it do not exist.
    Absent,
}

/// A file the executor should reconcile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute path of the file.
    pub path: Utf8PathBuf,
    /// Desired state.
    pub state: FileState,
}

/// A directory the executor should reconcile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDescriptor {
    /// Absolute path of the directory.
    pub path: Utf8PathBuf,
    /// Desired state.
    pub state: DirectoryState,
}

/// One deferred file-system mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Create, update or delete a file.
    File(FileDescriptor),
    /// Create or delete a directory.
    Directory(DirectoryDescriptor),
}

impl SideEffect {
    /// A file at `path` holding `contents`.
    #[must_use]
    pub fn write(path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self::File(FileDescriptor {
            path: path.into(),
            state: FileState::Present(contents.into()),
        })
    }

    /// No file at `path`.
    #[must_use]
    pub fn delete(path: impl Into<Utf8PathBuf>) -> Self {
        Self::File(FileDescriptor {
            path: path.into(),
            state: FileState::Absent,
        })
    }

    /// Path the side effect targets.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::File(file) => &file.path,
            Self::Directory(dir) => &dir.path,
        }
    }
}

/// Counts of what an execution did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Files or directories created or updated.
    pub written: usize,
    /// Files or directories deleted.
    pub removed: usize,
    /// Side effects whose target already matched.
    pub unchanged: usize,
}

impl ExecutionSummary {
    /// Return `true` when nothing on disk was modified.
    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        self.written == 0 && self.removed == 0
    }
}

/// Applies side effects to the file system.
pub trait SideEffectExecuting {
    /// Apply `side_effects` in order.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] for the first side effect that fails; the
    /// remaining side effects are not applied.
    fn execute(&self, side_effects: &[SideEffect]) -> Result<ExecutionSummary, EditError>;
}

/// Default executor working directly on the host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideEffectExecutor;

impl SideEffectExecuting for SideEffectExecutor {
    fn execute(&self, side_effects: &[SideEffect]) -> Result<ExecutionSummary, EditError> {
        let mut summary = ExecutionSummary::default();
        for effect in side_effects {
            let (outcome, removal) = match effect {
                SideEffect::File(FileDescriptor {
                    path,
                    state: FileState::Present(contents),
                }) => (file_io::write_if_changed(path, contents)?, false),
                SideEffect::File(FileDescriptor {
                    path,
                    state: FileState::Absent,
                }) => (file_io::remove_file_if_present(path)?, true),
                SideEffect::Directory(DirectoryDescriptor {
                    path,
                    state: DirectoryState::Present,
                }) => (file_io::create_dir_all(path)?, false),
                SideEffect::Directory(DirectoryDescriptor {
                    path,
                    state: DirectoryState::Absent,
                }) => (file_io::remove_dir_all_if_present(path)?, true),
            };
            match (outcome, removal) {
                (Outcome::Unchanged, _) => {
                    debug!(path = %effect.path(), "side effect already satisfied");
                    summary.unchanged += 1;
                }
                (Outcome::Changed, false) => {
                    info!(path = %effect.path(), "wrote side effect");
                    summary.written += 1;
                }
                (Outcome::Changed, true) => {
                    info!(path = %effect.path(), "removed side effect target");
                    summary.removed += 1;
                }
            }
        }
        Ok(summary)
    }
}
