//! The synthesised project model.
//!
//! A [`Project`] is what the graph mapper builds and the mapper chain
//! transforms: project naming and paths, base build settings, the editable
//! targets and the schemes. Dependencies live in the accompanying
//! [`crate::graph::ProjectGraph`].

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::graph::TargetName;
use crate::locator::EditableRole;

/// Directory, inside the project bundle, holding scheme files.
pub const SCHEMES_DIRECTORY: &str = "schemes";

/// A generated, editable project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Directory the project's files are relative to (the editing path).
    pub source_root: Utf8PathBuf,
    /// Location of the generated project bundle.
    pub project_path: Utf8PathBuf,
    /// Build settings shared by every target.
    pub base_settings: BTreeMap<String, String>,
    /// Editable targets, sorted by name.
    pub targets: Vec<Target>,
    /// Schemes, in the order they were added.
    pub schemes: Vec<Scheme>,
}

impl Project {
    /// Return `true` when a scheme named `name` exists.
    #[must_use]
    pub fn has_scheme(&self, name: &str) -> bool {
        self.schemes.iter().any(|scheme| scheme.name == name)
    }

    /// Absolute path of the file storing `scheme`.
    #[must_use]
    pub fn scheme_path(&self, scheme: &Scheme) -> Utf8PathBuf {
        self.project_path.join(scheme.relative_path())
    }
}

/// A target compiling one editable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Unique target name, shared with the graph.
    pub name: TargetName,
    /// Role of the compiled file.
    pub role: EditableRole,
    /// The compiled file.
    pub source: Utf8PathBuf,
}

/// A build and run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scheme {
    /// Scheme name.
    pub name: String,
    /// Targets built by the scheme.
    pub build_targets: Vec<TargetName>,
    /// Targets tested by the scheme.
    pub test_targets: Vec<TargetName>,
    /// Whether coverage is gathered when testing.
    pub code_coverage: bool,
    /// Executable launched when the scheme runs.
    pub run_action: Option<RunAction>,
    /// Whether the scheme was synthesised by the mapper chain.
    #[serde(skip)]
    pub autogenerated: bool,
}

impl Scheme {
    /// Path of the scheme file relative to the project bundle.
    #[must_use]
    pub fn relative_path(&self) -> Utf8PathBuf {
        Utf8Path::new(SCHEMES_DIRECTORY).join(format!("{}.json", self.name))
    }

    /// Serialise the scheme file contents.
    ///
    /// The output is pretty-printed JSON with a trailing newline and depends
    /// only on the scheme's fields.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialisation fails.
    pub fn render(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut contents = serde_json::to_vec_pretty(self)?;
        contents.push(b'\n');
        Ok(contents)
    }
}

/// Program launched by a scheme's run action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunAction {
    /// Executable to launch.
    pub executable: Utf8PathBuf,
    /// Launch arguments.
    pub arguments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scheme(name: &str) -> Scheme {
        Scheme {
            name: name.to_owned(),
            build_targets: vec![TargetName::new(name)],
            test_targets: Vec::new(),
            code_coverage: false,
            run_action: None,
            autogenerated: true,
        }
    }

    #[rstest]
    fn scheme_files_nest_by_name() {
        assert_eq!(
            scheme("Manifests/App/Project.swift").relative_path(),
            Utf8PathBuf::from("schemes/Manifests/App/Project.swift.json")
        );
    }

    #[rstest]
    fn rendered_scheme_is_stable_pretty_json() {
        let rendered = scheme("Setup").render().expect("render");
        let expected = concat!(
            "{\n",
            "  \"name\": \"Setup\",\n",
            "  \"build_targets\": [\n",
            "    \"Setup\"\n",
            "  ],\n",
            "  \"test_targets\": [],\n",
            "  \"code_coverage\": false,\n",
            "  \"run_action\": null\n",
            "}\n",
        );
        assert_eq!(String::from_utf8(rendered).expect("utf8"), expected);
    }

    #[rstest]
    fn run_action_is_serialised() {
        let mut with_run = scheme("Manifests");
        with_run.run_action = Some(RunAction {
            executable: Utf8PathBuf::from("/usr/local/bin/manifest-editor"),
            arguments: vec!["--path".to_owned(), "/work".to_owned()],
        });
        let rendered = String::from_utf8(with_run.render().expect("render")).expect("utf8");
        assert!(rendered.contains("\"executable\": \"/usr/local/bin/manifest-editor\""));
        assert!(!rendered.contains("autogenerated"));
    }

    #[rstest]
    fn project_reports_existing_schemes() {
        let project = Project {
            name: "Manifests".to_owned(),
            source_root: Utf8PathBuf::from("/work"),
            project_path: Utf8PathBuf::from("/out/Manifests.editproj"),
            base_settings: BTreeMap::new(),
            targets: Vec::new(),
            schemes: vec![scheme("Setup")],
        };
        assert!(project.has_scheme("Setup"));
        assert!(!project.has_scheme("Config"));
        assert_eq!(
            project.scheme_path(&project.schemes[0]),
            Utf8PathBuf::from("/out/Manifests.editproj/schemes/Setup.json")
        );
    }
}
