//! Editor settings.
//!
//! Every convention the editor relies on (where manifests live, what the
//! description framework is called, which schemes are synthesised) is a value
//! of [`EditorSettings`]. Settings are read from an optional YAML file; every
//! field has a default so an absent file, or a partial one, is valid.
//!
//! # Examples
//!
//! ```
//! use manifest_editor::settings::EditorSettings;
//!
//! let settings = EditorSettings::from_yaml("schemes:\n  code_coverage: true\n")
//!     .expect("parse settings");
//! assert!(settings.schemes.code_coverage);
//! assert_eq!(settings.project.name, "Manifests");
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::EditError;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorSettings {
    /// Where editable files are looked up.
    pub layout: Layout,
    /// How the description framework is found and named.
    pub framework: FrameworkSettings,
    /// Naming and build settings of the generated project.
    pub project: ProjectSettings,
    /// Scheme synthesis policy.
    pub schemes: SchemeSettings,
}

impl EditorSettings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Settings`] when the YAML is malformed or names an
    /// unknown field.
    pub fn from_yaml(yaml: &str) -> Result<Self, EditError> {
        serde_saphyr::from_str(yaml).map_err(|err| EditError::Settings {
            path: None,
            message: err.to_string(),
        })
    }

    /// Load settings from `path`, or return the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] when the file cannot be read and
    /// [`EditError::Settings`] when it cannot be parsed.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, EditError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| EditError::Io {
            action: "read settings file",
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml(&yaml).map_err(|err| match err {
            EditError::Settings { message, .. } => EditError::Settings {
                path: Some(path.to_owned()),
                message,
            },
            other => other,
        })
    }
}

/// File-system conventions used to discover editable files.
///
/// Relative paths are resolved against the editing path (`setup`) or against
/// the project root (`config`, `dependencies`, `helpers_directory`,
/// `templates_directory`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// File names recognised as manifests at any depth.
    pub manifest_file_names: Vec<String>,
    /// Directory holding shared tooling files; its presence marks the root.
    pub tooling_directory: Utf8PathBuf,
    /// Location of the config manifest.
    pub config: Utf8PathBuf,
    /// Location of the dependencies manifest.
    pub dependencies: Utf8PathBuf,
    /// Location of the setup manifest.
    pub setup: Utf8PathBuf,
    /// Directory of shared helper sources.
    pub helpers_directory: Utf8PathBuf,
    /// Directory of user templates.
    pub templates_directory: Utf8PathBuf,
    /// Extension of compilable sources (helpers and templates).
    pub source_extension: String,
    /// Extensions of template scaffolds.
    pub template_extensions: Vec<String>,
    /// Directory names never descended into while looking for manifests.
    pub skip_directories: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            manifest_file_names: vec!["Project.swift".to_owned(), "Workspace.swift".to_owned()],
            tooling_directory: Utf8PathBuf::from("Tooling"),
            config: Utf8PathBuf::from("Tooling/Config.swift"),
            dependencies: Utf8PathBuf::from("Tooling/Dependencies.swift"),
            setup: Utf8PathBuf::from("Setup.swift"),
            helpers_directory: Utf8PathBuf::from("Tooling/Helpers"),
            templates_directory: Utf8PathBuf::from("Tooling/Templates"),
            source_extension: "swift".to_owned(),
            template_extensions: vec!["stencil".to_owned()],
            skip_directories: [".git", ".build", "Derived", "node_modules"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Description framework lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkSettings {
    /// Bundle name searched next to the editor binary.
    pub name: String,
    /// Explicit framework location, bypassing the search.
    pub path: Option<Utf8PathBuf>,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            name: "ProjectDescription.framework".to_owned(),
            path: None,
        }
    }
}

/// Generated project naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Project name; also the file stem of the generated project.
    pub name: String,
    /// Extension of the generated project bundle.
    pub extension: String,
    /// Language version recorded in the base build settings.
    pub swift_version: String,
}

impl ProjectSettings {
    /// File name of the generated project, for example `Manifests.editproj`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "Manifests".to_owned(),
            extension: "editproj".to_owned(),
            swift_version: "5.0".to_owned(),
        }
    }
}

/// Scheme synthesis policy applied by the project mapper chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemeSettings {
    /// Synthesise one build scheme per target.
    pub autogenerate: bool,
    /// Enable coverage gathering in synthesised schemes.
    pub code_coverage: bool,
}

impl Default for SchemeSettings {
    fn default() -> Self {
        Self {
            autogenerate: true,
            code_coverage: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_document_yields_defaults() {
        let settings = EditorSettings::from_yaml("{}").expect("parse");
        assert_eq!(settings, EditorSettings::default());
        assert!(settings.schemes.autogenerate);
        assert!(!settings.schemes.code_coverage);
    }

    #[rstest]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = concat!(
            "project:\n",
            "  extension: ideproj\n",
            "layout:\n",
            "  manifest_file_names: [Package.swift]\n",
        );
        let settings = EditorSettings::from_yaml(yaml).expect("parse");
        assert_eq!(settings.project.file_name(), "Manifests.ideproj");
        assert_eq!(settings.layout.manifest_file_names, vec!["Package.swift"]);
        assert_eq!(settings.layout.setup, Utf8PathBuf::from("Setup.swift"));
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let err = EditorSettings::from_yaml("colour: blue\n").expect_err("unknown field");
        assert!(matches!(err, EditError::Settings { path: None, .. }));
    }

    #[rstest]
    fn missing_file_is_reported_as_io_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.yml")).expect("utf8");
        let err = EditorSettings::load(Some(&path)).expect_err("missing file");
        assert!(matches!(err, EditError::Io { .. }));
    }

    #[rstest]
    fn parse_errors_carry_the_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("settings.yml")).expect("utf8");
        std::fs::write(&path, "schemes: [1, 2\n").expect("write");
        let err = EditorSettings::load(Some(&path)).expect_err("malformed");
        match err {
            EditError::Settings { path: Some(reported), .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
