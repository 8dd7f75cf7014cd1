//! Synthetic target graph.
//!
//! Every editable file becomes a [`SyntheticTarget`]; the description
//! framework is one more target that every manifest-like target depends on.
//! The graph is keyed by [`TargetName`] in a sorted map, so iteration order,
//! and therefore everything derived from the graph, is deterministic.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8PathBuf;
//! use manifest_editor::graph::{ProjectGraph, SyntheticTarget, TargetKind, TargetName};
//!
//! let mut graph = ProjectGraph::default();
//! graph.insert(SyntheticTarget::new(
//!     TargetName::new("ProjectDescription"),
//!     TargetKind::Framework,
//!     Utf8PathBuf::from("/opt/ProjectDescription.framework"),
//! ));
//! let mut manifest = SyntheticTarget::new(
//!     TargetName::new("Manifests/Project.swift"),
//!     TargetKind::Editable(manifest_editor::locator::EditableRole::Manifest),
//!     Utf8PathBuf::from("/work/Project.swift"),
//! );
//! manifest.dependencies.insert(TargetName::new("ProjectDescription"));
//! graph.insert(manifest);
//!
//! assert_eq!(graph.edge_count(), 1);
//! assert!(graph.validate().is_ok());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::error::GraphInvariantViolation;
use crate::locator::EditableRole;

mod cycle;
mod mapper;

pub use mapper::{GraphMapperInput, ProjectEditorMapper};

/// Unique identifier of a target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetName(String);

impl TargetName {
    /// Wrap a target name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What a target stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// One editable file.
    Editable(EditableRole),
    /// The precompiled description framework.
    Framework,
}

/// A node of the project graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticTarget {
    /// Unique name.
    pub name: TargetName,
    /// What the target represents.
    pub kind: TargetKind,
    /// Source file, or framework bundle for [`TargetKind::Framework`].
    pub source: Utf8PathBuf,
    /// Names of the targets this one depends on.
    pub dependencies: BTreeSet<TargetName>,
}

impl SyntheticTarget {
    /// Create a target with no dependencies.
    #[must_use]
    pub const fn new(name: TargetName, kind: TargetKind, source: Utf8PathBuf) -> Self {
        Self {
            name,
            kind,
            source,
            dependencies: BTreeSet::new(),
        }
    }

    /// Role of the editable file behind this target, if any.
    #[must_use]
    pub const fn role(&self) -> Option<EditableRole> {
        match self.kind {
            TargetKind::Editable(role) => Some(role),
            TargetKind::Framework => None,
        }
    }
}

/// Targets and their dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    targets: BTreeMap<TargetName, SyntheticTarget>,
}

impl ProjectGraph {
    /// Insert `target`, replacing any target with the same name.
    pub fn insert(&mut self, target: SyntheticTarget) -> Option<SyntheticTarget> {
        self.targets.insert(target.name.clone(), target)
    }

    /// Look up a target by name.
    #[must_use]
    pub fn target(&self, name: &TargetName) -> Option<&SyntheticTarget> {
        self.targets.get(name)
    }

    /// Iterate over targets in name order.
    pub fn targets(&self) -> impl Iterator<Item = &SyntheticTarget> {
        self.targets.values()
    }

    /// Number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Return `true` when the graph has no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over `(dependent, dependency)` edges in name order.
    pub fn edges(&self) -> impl Iterator<Item = (&TargetName, &TargetName)> {
        self.targets
            .values()
            .flat_map(|target| target.dependencies.iter().map(move |dep| (&target.name, dep)))
    }

    /// Number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.targets.values().map(|t| t.dependencies.len()).sum()
    }

    /// Return `true` when `from` depends directly on `to`.
    #[must_use]
    pub fn has_edge(&self, from: &TargetName, to: &TargetName) -> bool {
        self.targets
            .get(from)
            .is_some_and(|target| target.dependencies.contains(to))
    }

    /// Check that every edge resolves and that the edges are acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphInvariantViolation::DanglingDependency`] for the first
    /// unresolved edge in name order, or [`GraphInvariantViolation::Cycle`]
    /// with the cycle rotated to start at its smallest name.
    pub fn validate(&self) -> Result<(), GraphInvariantViolation> {
        cycle::check(&self.targets)
    }
}
