//! Persistence of project descriptors.
//!
//! [`ProjectWriter`] merges a descriptor into whatever already exists at the
//! bundle path: unchanged files are not touched, the project document is
//! swapped in atomically, and scheme files the descriptor no longer lists are
//! pruned.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::descriptor::ProjectDescriptor;
use crate::error::EditError;
use crate::file_io::{self, Outcome};
use crate::project::SCHEMES_DIRECTORY;
use crate::side_effects::ExecutionSummary;

/// Persists a [`ProjectDescriptor`].
pub trait ProjectWriting {
    /// Write `descriptor` to its project path.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] when the bundle cannot be written.
    fn write(&self, descriptor: &ProjectDescriptor) -> Result<ExecutionSummary, EditError>;
}

/// Default writer targeting the host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectWriter;

impl ProjectWriter {
    fn record(summary: &mut ExecutionSummary, outcome: Outcome, path: &Utf8Path) {
        match outcome {
            Outcome::Changed => {
                info!(%path, "wrote project file");
                summary.written += 1;
            }
            Outcome::Unchanged => {
                debug!(%path, "project file unchanged");
                summary.unchanged += 1;
            }
        }
    }

    fn prune_schemes(
        project_path: &Utf8Path,
        keep: &BTreeSet<Utf8PathBuf>,
        summary: &mut ExecutionSummary,
    ) -> Result<(), EditError> {
        let schemes_dir = project_path.join(SCHEMES_DIRECTORY);
        if !schemes_dir.is_dir() {
            return Ok(());
        }
        // Children are visited before their directory, so a directory emptied
        // by pruning is seen after its last file has gone.
        for item in WalkDir::new(&schemes_dir)
            .min_depth(1)
            .contents_first(true)
            .sort_by_file_name()
        {
            let entry = item.map_err(|err| {
                EditError::io("scan scheme directory", schemes_dir.clone(), err.into())
            })?;
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 scheme entry");
                continue;
            };
            if entry.file_type().is_dir() {
                if file_io::remove_dir_if_empty(path)? == Outcome::Changed {
                    debug!(%path, "removed empty scheme directory");
                }
                continue;
            }
            let Ok(relative) = path.strip_prefix(project_path) else {
                continue;
            };
            if keep.contains(relative) {
                continue;
            }
            if file_io::remove_file_if_present(path)? == Outcome::Changed {
                info!(%path, "removed stale scheme");
                summary.removed += 1;
            }
        }
        Ok(())
    }
}

impl ProjectWriting for ProjectWriter {
    fn write(&self, descriptor: &ProjectDescriptor) -> Result<ExecutionSummary, EditError> {
        let mut summary = ExecutionSummary::default();
        file_io::create_dir_all(&descriptor.project_path)?;

        let document = descriptor.document_path();
        let outcome = file_io::replace_if_changed(&document, &descriptor.contents)?;
        Self::record(&mut summary, outcome, &document);

        for scheme in &descriptor.schemes {
            let Some(contents) = &scheme.contents else {
                continue;
            };
            let path = descriptor.project_path.join(&scheme.relative_path);
            let written = file_io::write_if_changed(&path, contents)?;
            Self::record(&mut summary, written, &path);
        }

        let keep: BTreeSet<Utf8PathBuf> = descriptor
            .schemes
            .iter()
            .map(|scheme| scheme.relative_path.clone())
            .collect();
        Self::prune_schemes(&descriptor.project_path, &keep, &mut summary)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SchemeDescriptor;
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Bundle {
        _dir: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn bundle() -> Bundle {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        Bundle {
            _dir: dir,
            path: root.join("out/Manifests.editproj"),
        }
    }

    fn descriptor(path: &Utf8Path, schemes: Vec<SchemeDescriptor>) -> ProjectDescriptor {
        ProjectDescriptor {
            project_path: path.to_owned(),
            contents: b"{}\n".to_vec(),
            schemes,
        }
    }

    fn explicit(name: &str) -> SchemeDescriptor {
        SchemeDescriptor {
            relative_path: Utf8PathBuf::from(format!("schemes/{name}.json")),
            contents: Some(format!("{name}\n").into_bytes()),
        }
    }

    #[rstest]
    fn writes_document_and_explicit_schemes(bundle: Bundle) -> Result<()> {
        let summary = ProjectWriter.write(&descriptor(&bundle.path, vec![explicit("Manifests")]))?;
        ensure!(summary.written == 2, "summary: {summary:?}");
        ensure!(std::fs::read_to_string(bundle.path.join("project.json"))? == "{}\n");
        let scheme = std::fs::read_to_string(bundle.path.join("schemes/Manifests.json"))?;
        ensure!(scheme == "Manifests\n", "scheme: {scheme}");
        Ok(())
    }

    #[rstest]
    fn rewriting_identical_descriptor_changes_nothing(bundle: Bundle) -> Result<()> {
        let desc = descriptor(&bundle.path, vec![explicit("Manifests")]);
        ProjectWriter.write(&desc)?;
        let second = ProjectWriter.write(&desc)?;
        ensure!(second.is_no_op(), "summary: {second:?}");
        ensure!(second.unchanged == 2);
        Ok(())
    }

    #[rstest]
    fn stale_schemes_are_pruned_and_listed_ones_kept(bundle: Bundle) -> Result<()> {
        let generated = bundle.path.join("schemes/Manifests/Project.swift.json");
        let stale = bundle.path.join("schemes/Manifests/Old.swift.json");
        std::fs::create_dir_all(bundle.path.join("schemes/Manifests"))?;
        std::fs::write(&generated, "generated")?;
        std::fs::write(&stale, "stale")?;
        let other = bundle.path.join("notes.txt");
        std::fs::write(&other, "user file")?;

        let summary = ProjectWriter.write(&descriptor(
            &bundle.path,
            vec![
                explicit("Manifests"),
                SchemeDescriptor {
                    relative_path: Utf8PathBuf::from("schemes/Manifests/Project.swift.json"),
                    contents: None,
                },
            ],
        ))?;
        ensure!(summary.removed == 1, "summary: {summary:?}");
        ensure!(!stale.exists());
        ensure!(std::fs::read_to_string(&generated)? == "generated");
        ensure!(other.exists(), "files outside the scheme directory must survive");
        Ok(())
    }

    #[rstest]
    fn directories_emptied_by_pruning_are_removed(bundle: Bundle) -> Result<()> {
        let nested = bundle.path.join("schemes/Manifests/Other");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(nested.join("Project.swift.json"), "stale")?;

        let summary = ProjectWriter.write(&descriptor(&bundle.path, vec![explicit("Manifests")]))?;

        ensure!(summary.removed == 1, "summary: {summary:?}");
        ensure!(!bundle.path.join("schemes/Manifests").exists(), "empty directories kept");
        ensure!(bundle.path.join("schemes/Manifests.json").is_file());
        Ok(())
    }
}
