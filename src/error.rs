//! Error types surfaced by the editing pipeline.
//!
//! [`EditError`] covers every user-facing failure. Structural defects in the
//! synthesised graph are reported separately through
//! [`GraphInvariantViolation`], wrapped in [`EditError::GraphInvariant`], so
//! they can never be mistaken for a problem with the user's directory.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others. Since `#[expect]` fails when the lint doesn't
// fire, and `unfulfilled_lint_expectations` cannot be expected, we must use
// `#[allow]` here.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::graph::TargetName;

/// Errors raised while synthesising an editable project.
#[derive(Debug, Error, Diagnostic)]
pub enum EditError {
    /// The editing path holds no manifests, helpers or templates.
    #[error("there are no editable files at {path}")]
    #[diagnostic(
        code(manifest_editor::no_editable_files),
        help("run the editor from a directory containing project manifests")
    )]
    NoEditableFiles {
        /// Directory that was searched.
        path: Utf8PathBuf,
    },

    /// The description framework could not be found on this host.
    #[error(
        "could not locate the description framework `{name}` (searched: {})",
        .searched.iter().join(", ")
    )]
    #[diagnostic(
        code(manifest_editor::resource_not_found),
        help("install the framework next to the editor or set `framework.path` in the settings")
    )]
    ResourceNotFound {
        /// Framework bundle name.
        name: String,
        /// Candidate locations that were checked.
        searched: Vec<Utf8PathBuf>,
    },

    /// A file-system operation failed.
    #[error("failed to {action} {path}")]
    #[diagnostic(code(manifest_editor::io))]
    Io {
        /// Short description of the attempted operation.
        action: &'static str,
        /// Path the operation targeted.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The project could not be lowered into a descriptor.
    #[error("project generation failed: {message}")]
    #[diagnostic(code(manifest_editor::generation))]
    Generation {
        /// Description of the structural problem.
        message: String,
    },

    /// The settings file is malformed.
    #[error("invalid settings{}: {message}", .path.as_ref().map(|p| format!(" in {p}")).unwrap_or_default())]
    #[diagnostic(code(manifest_editor::settings))]
    Settings {
        /// Settings file, when the settings came from disk.
        path: Option<Utf8PathBuf>,
        /// Parser message.
        message: String,
    },

    /// Internal defect: the synthesised graph broke one of its invariants.
    #[error(transparent)]
    #[diagnostic(transparent)]
    GraphInvariant(#[from] GraphInvariantViolation),
}

/// Structural defects in a synthesised project graph.
///
/// These indicate a logic error in graph construction and should never be
/// reachable from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GraphInvariantViolation {
    /// The dependency edges form a cycle.
    #[error("internal error: dependency cycle detected: {}", .cycle.iter().join(" -> "))]
    #[diagnostic(
        code(manifest_editor::internal::cycle),
        help("this is a bug in the editor; please report it")
    )]
    Cycle {
        /// Targets on the cycle, starting and ending with the same name.
        cycle: Vec<TargetName>,
    },

    /// A dependency edge points at a target absent from the graph.
    #[error("internal error: target `{target}` depends on unknown target `{dependency}`")]
    #[diagnostic(
        code(manifest_editor::internal::dangling_dependency),
        help("this is a bug in the editor; please report it")
    )]
    DanglingDependency {
        /// Dependent target.
        target: TargetName,
        /// Missing dependency.
        dependency: TargetName,
    },
}

impl EditError {
    /// Build an [`EditError::Io`] for `path`.
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Return `true` for internal defects rather than user-facing failures.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::GraphInvariant(_))
    }
}
