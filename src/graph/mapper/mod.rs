//! Mapping of editable files onto a project and its target graph.

use std::collections::BTreeMap;

use camino::Utf8Path;
use tracing::debug;

use super::{ProjectGraph, SyntheticTarget, TargetKind, TargetName};
use crate::error::EditError;
use crate::locator::{EditableFileSet, EditablePath, EditableRole};
use crate::project::{Project, RunAction, Scheme, Target};
use crate::settings::ProjectSettings;

/// Fallback framework target name when the bundle path has no file stem.
const DEFAULT_FRAMEWORK_TARGET: &str = "ProjectDescription";

/// Everything the graph mapper needs for one editing session.
#[derive(Debug, Clone, Copy)]
pub struct GraphMapperInput<'a> {
    /// The editor executable that launched this session.
    pub self_path: &'a Utf8Path,
    /// Directory being edited.
    pub source_root: &'a Utf8Path,
    /// Location of the project bundle to generate.
    pub project_path: &'a Utf8Path,
    /// Located editable files.
    pub files: &'a EditableFileSet,
    /// The description framework bundle.
    pub framework_path: &'a Utf8Path,
}

/// Builds the project description and the target graph from editable files.
#[derive(Debug, Clone, Default)]
pub struct ProjectEditorMapper {
    settings: ProjectSettings,
}

impl ProjectEditorMapper {
    /// Create a mapper using the given project settings.
    #[must_use]
    pub const fn new(settings: ProjectSettings) -> Self {
        Self { settings }
    }

    /// Map the located files onto a [`Project`] and a [`ProjectGraph`].
    ///
    /// One target is created per editable file plus one for the description
    /// framework. Every non-helper target depends on the framework and on
    /// every helper.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoEditableFiles`] when there are no manifests,
    /// helpers or templates, and [`EditError::GraphInvariant`] if the
    /// constructed graph is cyclic or has a dangling edge.
    pub fn map(&self, input: &GraphMapperInput<'_>) -> Result<(Project, ProjectGraph), EditError> {
        let files = input.files;
        if files.is_empty() {
            return Err(EditError::NoEditableFiles {
                path: input.source_root.to_owned(),
            });
        }

        let framework_name = framework_target_name(input.framework_path);
        let helper_names: Vec<TargetName> = files
            .paths()
            .filter(|editable| editable.role == EditableRole::Helper)
            .map(|editable| target_name(&editable, files))
            .collect();

        let mut graph = ProjectGraph::default();
        graph.insert(SyntheticTarget::new(
            framework_name.clone(),
            TargetKind::Framework,
            input.framework_path.to_owned(),
        ));
        for editable in files.paths() {
            let mut target = SyntheticTarget::new(
                target_name(&editable, files),
                TargetKind::Editable(editable.role),
                editable.path,
            );
            if editable.role != EditableRole::Helper {
                target.dependencies.insert(framework_name.clone());
                target.dependencies.extend(helper_names.iter().cloned());
            }
            graph.insert(target);
        }
        graph.validate()?;
        debug!(
            targets = graph.len(),
            edges = graph.edge_count(),
            "mapped editable files onto the project graph"
        );

        let project = self.project(input, &graph);
        Ok((project, graph))
    }

    fn project(&self, input: &GraphMapperInput<'_>, graph: &ProjectGraph) -> Project {
        let targets: Vec<Target> = graph
            .targets()
            .filter_map(|target| {
                target.role().map(|role| Target {
                    name: target.name.clone(),
                    role,
                    source: target.source.clone(),
                })
            })
            .collect();

        let search_path = input
            .framework_path
            .parent()
            .unwrap_or(input.framework_path)
            .to_string();
        let base_settings = BTreeMap::from([
            ("FRAMEWORK_SEARCH_PATHS".to_owned(), search_path.clone()),
            ("SWIFT_INCLUDE_PATHS".to_owned(), search_path),
            (
                "SWIFT_VERSION".to_owned(),
                self.settings.swift_version.clone(),
            ),
        ]);

        let destination = input.project_path.parent().unwrap_or(input.project_path);
        let regenerate = Scheme {
            name: self.settings.name.clone(),
            build_targets: targets.iter().map(|target| target.name.clone()).collect(),
            test_targets: Vec::new(),
            code_coverage: false,
            run_action: Some(RunAction {
                executable: input.self_path.to_owned(),
                arguments: vec![
                    "--path".to_owned(),
                    input.source_root.to_string(),
                    "--destination".to_owned(),
                    destination.to_string(),
                ],
            }),
            autogenerated: false,
        };

        Project {
            name: self.settings.name.clone(),
            source_root: input.source_root.to_owned(),
            project_path: input.project_path.to_owned(),
            base_settings,
            targets,
            schemes: vec![regenerate],
        }
    }
}

/// Derive the unique target name of an editable file.
///
/// Single-location roles are named after their group; the others append the
/// file path relative to the directory the role is discovered in.
fn target_name(editable: &EditablePath, files: &EditableFileSet) -> TargetName {
    let base = match editable.role {
        EditableRole::Manifest => Some(files.root.as_path()),
        EditableRole::Helper => files.helpers_directory.as_deref(),
        EditableRole::Template => files.templates_directory.as_deref(),
        EditableRole::Config | EditableRole::Dependencies | EditableRole::Setup => {
            return TargetName::new(editable.role.group_name());
        }
    };
    let relative = base
        .and_then(|dir| editable.path.strip_prefix(dir).ok())
        .map_or_else(
            || editable.path.as_str().trim_start_matches('/'),
            Utf8Path::as_str,
        );
    TargetName::new(format!("{}/{relative}", editable.role.group_name()))
}

fn framework_target_name(framework_path: &Utf8Path) -> TargetName {
    TargetName::new(
        framework_path
            .file_stem()
            .unwrap_or(DEFAULT_FRAMEWORK_TARGET),
    )
}
