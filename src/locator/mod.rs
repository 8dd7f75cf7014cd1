//! Discovery of editable files.
//!
//! The locator turns an editing directory into an [`EditableFileSet`]: every
//! manifest found at any depth and the setup manifest of the editing
//! directory, plus the config and dependencies manifests and the helper and
//! template sources of the enclosing project root (see [`locate_root`]).
//! Absence is always representable; the locator never fails.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::settings::Layout;

mod root;
mod sources;
mod walk;

pub use root::locate_root;

/// Role an editable file plays in the synthesised project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditableRole {
    /// Project or workspace manifest.
    Manifest,
    /// Global configuration manifest.
    Config,
    /// External dependencies manifest.
    Dependencies,
    /// Environment setup manifest.
    Setup,
    /// Shared helper source visible to every other file.
    Helper,
    /// User-authored template.
    Template,
}

impl EditableRole {
    /// Every role, in the order groups appear in the generated project.
    pub const ALL: [Self; 6] = [
        Self::Manifest,
        Self::Config,
        Self::Dependencies,
        Self::Setup,
        Self::Helper,
        Self::Template,
    ];

    /// Name of the project group holding files of this role.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Self::Manifest => "Manifests",
            Self::Config => "Config",
            Self::Dependencies => "Dependencies",
            Self::Setup => "Setup",
            Self::Helper => "Helpers",
            Self::Template => "Templates",
        }
    }
}

impl fmt::Display for EditableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Manifest => "manifest",
            Self::Config => "config",
            Self::Dependencies => "dependencies",
            Self::Setup => "setup",
            Self::Helper => "helper",
            Self::Template => "template",
        };
        f.write_str(name)
    }
}

/// An existing file tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditablePath {
    /// Role of the file.
    pub role: EditableRole,
    /// Absolute path of the file.
    pub path: Utf8PathBuf,
}

/// All editable files discovered for one editing session.
///
/// Path lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableFileSet {
    /// The editing directory.
    pub root: Utf8PathBuf,
    /// Manifests found at any depth below `root`.
    pub manifests: Vec<Utf8PathBuf>,
    /// Config manifest of the project root, when present.
    pub config: Option<Utf8PathBuf>,
    /// Dependencies manifest of the project root, when present.
    pub dependencies: Option<Utf8PathBuf>,
    /// Setup manifest, when present.
    pub setup: Option<Utf8PathBuf>,
    /// Helpers directory, when present.
    pub helpers_directory: Option<Utf8PathBuf>,
    /// Helper sources.
    pub helpers: Vec<Utf8PathBuf>,
    /// Templates directory, when present.
    pub templates_directory: Option<Utf8PathBuf>,
    /// Template sources and scaffolds.
    pub templates: Vec<Utf8PathBuf>,
}

impl EditableFileSet {
    /// Return `true` when there is nothing to build a project from.
    ///
    /// Config, dependencies and setup manifests alone do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty() && self.helpers.is_empty() && self.templates.is_empty()
    }

    /// Iterate over every file, grouped by role in [`EditableRole::ALL`] order.
    pub fn paths(&self) -> impl Iterator<Item = EditablePath> + '_ {
        let tag = |role: EditableRole| {
            move |path: &Utf8PathBuf| EditablePath {
                role,
                path: path.clone(),
            }
        };
        self.manifests
            .iter()
            .map(tag(EditableRole::Manifest))
            .chain(self.config.iter().map(tag(EditableRole::Config)))
            .chain(self.dependencies.iter().map(tag(EditableRole::Dependencies)))
            .chain(self.setup.iter().map(tag(EditableRole::Setup)))
            .chain(self.helpers.iter().map(tag(EditableRole::Helper)))
            .chain(self.templates.iter().map(tag(EditableRole::Template)))
    }

    /// Number of files with the given role.
    #[must_use]
    pub fn count(&self, role: EditableRole) -> usize {
        match role {
            EditableRole::Manifest => self.manifests.len(),
            EditableRole::Config => usize::from(self.config.is_some()),
            EditableRole::Dependencies => usize::from(self.dependencies.is_some()),
            EditableRole::Setup => usize::from(self.setup.is_some()),
            EditableRole::Helper => self.helpers.len(),
            EditableRole::Template => self.templates.len(),
        }
    }
}

/// Locates editable files according to a [`Layout`].
#[derive(Debug, Clone, Default)]
pub struct EditableFilesLocator {
    layout: Layout,
}

impl EditableFilesLocator {
    /// Create a locator for the given layout.
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Discover every editable file for `editing_path`.
    ///
    /// `editing_path` should be absolute; the returned paths are rooted at it.
    #[must_use]
    pub fn locate(&self, editing_path: &Utf8Path) -> EditableFileSet {
        let root = locate_root(editing_path, &self.layout.tooling_directory);
        let helpers_directory = self.locate_helpers_directory(&root);
        let templates_directory = self.locate_templates_directory(&root);

        let config = existing_file(&root.join(&self.layout.config));
        let dependencies = existing_file(&root.join(&self.layout.dependencies));
        let setup = existing_file(&editing_path.join(&self.layout.setup));

        let excluded: Vec<&Utf8Path> = helpers_directory
            .iter()
            .chain(templates_directory.iter())
            .map(Utf8PathBuf::as_path)
            .collect();
        let mut manifests = walk::find_manifests(
            editing_path,
            &self.layout.manifest_file_names,
            &walk::SkipRules::new(&self.layout.skip_directories, &excluded),
        );
        // A single-location manifest keeps its dedicated role even when its
        // file name is also listed as a manifest name.
        manifests.retain(|path| {
            ![&config, &dependencies, &setup]
                .into_iter()
                .any(|fixed| fixed.as_ref() == Some(path))
        });

        let helpers = helpers_directory.as_deref().map_or_else(Vec::new, |dir| {
            sources::find_sources(dir, std::slice::from_ref(&self.layout.source_extension))
        });
        let template_extensions: Vec<String> = std::iter::once(&self.layout.source_extension)
            .chain(&self.layout.template_extensions)
            .cloned()
            .collect();
        let templates = templates_directory
            .as_deref()
            .map_or_else(Vec::new, |dir| sources::find_sources(dir, &template_extensions));

        let files = EditableFileSet {
            root: editing_path.to_owned(),
            manifests,
            config,
            dependencies,
            setup,
            helpers_directory,
            helpers,
            templates_directory,
            templates,
        };
        debug!(
            root = %files.root,
            project_root = %root,
            manifests = files.count(EditableRole::Manifest),
            helpers = files.count(EditableRole::Helper),
            templates = files.count(EditableRole::Template),
            config = files.count(EditableRole::Config),
            dependencies = files.count(EditableRole::Dependencies),
            setup = files.count(EditableRole::Setup),
            "located editable files"
        );
        files
    }

    /// Return the helpers directory below `root`, if it exists.
    #[must_use]
    pub fn locate_helpers_directory(&self, root: &Utf8Path) -> Option<Utf8PathBuf> {
        existing_dir(&root.join(&self.layout.helpers_directory))
    }

    /// Return the user templates directory below `root`, if it exists.
    #[must_use]
    pub fn locate_templates_directory(&self, root: &Utf8Path) -> Option<Utf8PathBuf> {
        existing_dir(&root.join(&self.layout.templates_directory))
    }
}

fn existing_file(path: &Utf8Path) -> Option<Utf8PathBuf> {
    path.is_file().then(|| path.to_owned())
}

fn existing_dir(path: &Utf8Path) -> Option<Utf8PathBuf> {
    path.is_dir().then(|| path.to_owned())
}
