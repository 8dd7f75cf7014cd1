//! CLI execution.
//!
//! This module keeps `main` minimal: it resolves paths and settings from the
//! parsed [`Cli`], builds a [`ProjectEditor`] with the matching status
//! reporter and runs it.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tracing::debug;

use crate::cli::Cli;
use crate::editor::ProjectEditor;
use crate::error::EditError;
use crate::settings::EditorSettings;
use crate::status::{AccessibleReporter, IndicatifReporter, SilentReporter};

pub mod output_mode;
mod paths;

use output_mode::OutputMode;

/// Generate the editable project described by `cli` and return its path.
///
/// # Errors
///
/// Returns an error when the paths cannot be resolved, the settings are
/// invalid, or the edit fails.
pub fn run(cli: &Cli) -> Result<Utf8PathBuf> {
    let cwd = paths::utf8(
        std::env::current_dir().context("reading the current directory")?,
        "current directory",
    )?;
    let editing_path = paths::editing_path(cli, &cwd)?;
    let destination = paths::destination(cli, &cwd, &editing_path)?;
    let settings_path = cli
        .settings
        .as_deref()
        .map(|path| paths::absolute(&cwd, path));
    let settings = EditorSettings::load(settings_path.as_deref())
        .context("loading editor settings")?;
    let self_path = paths::utf8(
        std::env::current_exe().context("locating the editor executable")?,
        "editor executable path",
    )?;
    debug!(
        editing = %editing_path,
        destination = %destination,
        self_path = %self_path,
        "resolved editing session"
    );

    let editor = ProjectEditor::new(settings, self_path);
    let editor = match (output_mode::resolve(cli.accessible), cli.progress.unwrap_or(true)) {
        (OutputMode::Accessible, _) => editor.with_reporter(AccessibleReporter),
        (OutputMode::Standard, true) => editor.with_reporter(IndicatifReporter::new()),
        (OutputMode::Standard, false) => editor.with_reporter(SilentReporter),
    };
    editor
        .edit(&editing_path, &destination)
        .with_context(|| format!("editing {editing_path}"))
}

/// Return `true` when `err` stems from a defect in the editor itself rather
/// than from the user's input or environment.
#[must_use]
pub fn is_internal_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<EditError>())
        .any(EditError::is_internal)
}
