//! Command line interface definition using clap.
//!
//! The CLI is a thin layer over [`crate::editor::ProjectEditor`]: it picks the
//! editing path, the destination and the settings file, and chooses how
//! progress is reported.

use camino::Utf8PathBuf;
use clap::Parser;

/// Generates an editable IDE project from a directory of project manifests.
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the manifests to edit.
    ///
    /// Defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<Utf8PathBuf>,

    /// Directory the editable project is generated into.
    ///
    /// Defaults to a cache directory derived from the editing path.
    #[arg(short = 'o', long, value_name = "DIR", conflicts_with = "permanent")]
    pub destination: Option<Utf8PathBuf>,

    /// Generate the project inside the edited directory.
    #[arg(long)]
    pub permanent: bool,

    /// YAML file overriding the editor's conventions.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<Utf8PathBuf>,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Force accessible output mode on or off (overrides auto-detection).
    #[arg(long)]
    pub accessible: Option<bool>,

    /// Force standard progress summaries on or off.
    ///
    /// When omitted, progress summaries are shown in standard mode.
    #[arg(long)]
    pub progress: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[rstest]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn parses_every_flag() {
        let cli = Cli::try_parse_from([
            "manifest-editor",
            "-p",
            "app",
            "-o",
            "out",
            "--settings",
            "editor.yml",
            "-v",
            "--accessible",
            "true",
            "--progress",
            "false",
        ])
        .expect("parse");
        assert_eq!(cli.path.as_deref(), Some(camino::Utf8Path::new("app")));
        assert_eq!(cli.destination.as_deref(), Some(camino::Utf8Path::new("out")));
        assert_eq!(cli.settings.as_deref(), Some(camino::Utf8Path::new("editor.yml")));
        assert!(cli.verbose);
        assert_eq!(cli.accessible, Some(true));
        assert_eq!(cli.progress, Some(false));
        assert!(!cli.permanent);
    }

    #[rstest]
    fn destination_conflicts_with_permanent() {
        let err = Cli::try_parse_from(["manifest-editor", "--permanent", "-o", "out"])
            .expect_err("conflicting flags");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
