//! Lowering of a mapped project into a serialisable project descriptor.
//!
//! The descriptor is what the [`crate::writer`] persists: the bytes of the
//! bundle's `project.json` and the scheme files the bundle must contain.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::EditError;
use crate::graph::{ProjectGraph, TargetKind, TargetName};
use crate::locator::EditableRole;
use crate::project::Project;

/// File name of the project document inside the bundle.
pub const PROJECT_DOCUMENT: &str = "project.json";

/// A project ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Location of the project bundle.
    pub project_path: Utf8PathBuf,
    /// Contents of the project document.
    pub contents: Vec<u8>,
    /// Every scheme the bundle must contain.
    pub schemes: Vec<SchemeDescriptor>,
}

impl ProjectDescriptor {
    /// Absolute path of the project document.
    #[must_use]
    pub fn document_path(&self) -> Utf8PathBuf {
        self.project_path.join(PROJECT_DOCUMENT)
    }
}

/// A scheme file belonging to the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeDescriptor {
    /// Path relative to the bundle.
    pub relative_path: Utf8PathBuf,
    /// Contents to write, or `None` when the file is produced as a side
    /// effect and only needs to be kept.
    pub contents: Option<Vec<u8>>,
}

/// Lowers a project and its graph into a [`ProjectDescriptor`].
pub trait DescriptorGenerating {
    /// Generate the descriptor for `project`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Generation`] when the project and graph disagree.
    fn generate(
        &self,
        project: &Project,
        graph: &ProjectGraph,
    ) -> Result<ProjectDescriptor, EditError>;
}

/// Default generator producing a JSON project document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorGenerator;

#[derive(Serialize)]
struct Document<'a> {
    name: &'a str,
    source_root: &'a Utf8Path,
    base_settings: &'a BTreeMap<String, String>,
    groups: IndexMap<&'static str, Vec<Utf8PathBuf>>,
    targets: Vec<TargetEntry<'a>>,
    frameworks: Vec<FrameworkEntry<'a>>,
    schemes: Vec<&'a str>,
}

#[derive(Serialize)]
struct TargetEntry<'a> {
    name: &'a TargetName,
    role: String,
    source: Utf8PathBuf,
    dependencies: Vec<&'a TargetName>,
}

#[derive(Serialize)]
struct FrameworkEntry<'a> {
    name: &'a TargetName,
    path: &'a Utf8Path,
}

fn relative_to(path: &Utf8Path, root: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_owned(), Utf8Path::to_owned)
}

impl DescriptorGenerating for DescriptorGenerator {
    fn generate(
        &self,
        project: &Project,
        graph: &ProjectGraph,
    ) -> Result<ProjectDescriptor, EditError> {
        let mut groups: IndexMap<&'static str, Vec<Utf8PathBuf>> = IndexMap::new();
        for role in EditableRole::ALL {
            let mut files: Vec<Utf8PathBuf> = project
                .targets
                .iter()
                .filter(|target| target.role == role)
                .map(|target| relative_to(&target.source, &project.source_root))
                .collect();
            if files.is_empty() {
                continue;
            }
            files.sort();
            groups.insert(role.group_name(), files);
        }

        let mut targets = Vec::with_capacity(project.targets.len());
        for target in &project.targets {
            let node = graph.target(&target.name).ok_or_else(|| EditError::Generation {
                message: format!("target `{}` is missing from the project graph", target.name),
            })?;
            if let Some(dependency) = node
                .dependencies
                .iter()
                .find(|dependency| graph.target(dependency).is_none())
            {
                return Err(EditError::Generation {
                    message: format!(
                        "target `{}` depends on `{dependency}`, which is not in the graph",
                        target.name
                    ),
                });
            }
            targets.push(TargetEntry {
                name: &target.name,
                role: target.role.to_string(),
                source: relative_to(&target.source, &project.source_root),
                dependencies: node.dependencies.iter().collect(),
            });
        }

        let frameworks = graph
            .targets()
            .filter(|target| target.kind == TargetKind::Framework)
            .map(|target| FrameworkEntry {
                name: &target.name,
                path: &target.source,
            })
            .collect();

        let document = Document {
            name: &project.name,
            source_root: &project.source_root,
            base_settings: &project.base_settings,
            groups,
            targets,
            frameworks,
            schemes: project.schemes.iter().map(|s| s.name.as_str()).collect(),
        };
        let mut contents =
            serde_json::to_vec_pretty(&document).map_err(|err| EditError::Generation {
                message: format!("cannot serialise the project document: {err}"),
            })?;
        contents.push(b'\n');

        let schemes = project
            .schemes
            .iter()
            .map(|scheme| {
                let contents = if scheme.autogenerated {
                    None
                } else {
                    Some(scheme.render().map_err(|err| EditError::Generation {
                        message: format!("cannot render scheme `{}`: {err}", scheme.name),
                    })?)
                };
                Ok(SchemeDescriptor {
                    relative_path: scheme.relative_path(),
                    contents,
                })
            })
            .collect::<Result<Vec<_>, EditError>>()?;

        debug!(
            project = %project.project_path,
            targets = project.targets.len(),
            schemes = schemes.len(),
            "generated project descriptor"
        );
        Ok(ProjectDescriptor {
            project_path: project.project_path.clone(),
            contents,
            schemes,
        })
    }
}
