//! The editing pipeline.
//!
//! [`ProjectEditor::edit`] runs the stages in a fixed order:
//!
//! ```text
//! locate -> (nothing editable? fail) -> map graph -> apply project mappers
//!        -> execute side effects -> generate descriptor -> write
//! ```
//!
//! Each stage consumes only the previous stage's output, and the first error
//! aborts the run. The descriptor generator and the writer only run once
//! every side effect has been applied, so a half-synthesised project is never
//! written. Side effects are not transactional with the final write;
//! re-running `edit` converges because every side effect is idempotent.
//!
//! Collaborators with host access (the resource locator, the side-effect
//! executor, the descriptor generator, the writer and the status reporter)
//! are injected and can be replaced with the `with_*` builders.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::descriptor::{DescriptorGenerating, DescriptorGenerator};
use crate::error::EditError;
use crate::graph::{GraphMapperInput, ProjectEditorMapper};
use crate::locator::EditableFilesLocator;
use crate::project_mapper::SequentialProjectMapper;
use crate::resource::{ResourceLocating, ResourceLocator};
use crate::settings::EditorSettings;
use crate::side_effects::{SideEffectExecuting, SideEffectExecutor};
use crate::status::{EditStage, SilentReporter, StatusReporter};
use crate::writer::{ProjectWriter, ProjectWriting};

/// Synthesises editable projects from directories of manifests.
pub struct ProjectEditor {
    project_file_name: String,
    self_path: Utf8PathBuf,
    locator: EditableFilesLocator,
    graph_mapper: ProjectEditorMapper,
    project_mapper: SequentialProjectMapper,
    resource_locator: Box<dyn ResourceLocating>,
    side_effect_executor: Box<dyn SideEffectExecuting>,
    descriptor_generator: Box<dyn DescriptorGenerating>,
    writer: Box<dyn ProjectWriting>,
    reporter: Box<dyn StatusReporter>,
}

impl ProjectEditor {
    /// Create an editor with the default collaborators.
    ///
    /// `self_path` is the editor executable; the generated project's
    /// regenerate scheme launches it and the description framework is looked
    /// up next to it.
    #[must_use]
    pub fn new(settings: EditorSettings, self_path: impl Into<Utf8PathBuf>) -> Self {
        let self_path = self_path.into();
        let EditorSettings {
            layout,
            framework,
            project,
            schemes,
        } = settings;
        Self {
            project_file_name: project.file_name(),
            resource_locator: Box::new(ResourceLocator::new(framework, self_path.clone())),
            self_path,
            locator: EditableFilesLocator::new(layout),
            graph_mapper: ProjectEditorMapper::new(project),
            project_mapper: SequentialProjectMapper::from_settings(&schemes),
            side_effect_executor: Box::new(SideEffectExecutor),
            descriptor_generator: Box::new(DescriptorGenerator),
            writer: Box::new(ProjectWriter),
            reporter: Box::new(SilentReporter),
        }
    }

    /// Replace the description framework locator.
    #[must_use]
    pub fn with_resource_locator(mut self, locator: impl ResourceLocating + 'static) -> Self {
        self.resource_locator = Box::new(locator);
        self
    }

    /// Replace the side-effect executor.
    #[must_use]
    pub fn with_side_effect_executor(
        mut self,
        executor: impl SideEffectExecuting + 'static,
    ) -> Self {
        self.side_effect_executor = Box::new(executor);
        self
    }

    /// Replace the descriptor generator.
    #[must_use]
    pub fn with_descriptor_generator(
        mut self,
        generator: impl DescriptorGenerating + 'static,
    ) -> Self {
        self.descriptor_generator = Box::new(generator);
        self
    }

    /// Replace the project writer.
    #[must_use]
    pub fn with_writer(mut self, writer: impl ProjectWriting + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Replace the status reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl StatusReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Location of the project generated into `destination`.
    #[must_use]
    pub fn project_path(&self, destination: &Utf8Path) -> Utf8PathBuf {
        destination.join(&self.project_file_name)
    }

    /// Generate or update the editable project for `editing_path` under
    /// `destination` and return the project's path.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoEditableFiles`] when `editing_path` holds no
    /// manifests, helpers or templates; nothing is written in that case.
    /// Otherwise returns the first error raised by a stage.
    pub fn edit(
        &self,
        editing_path: &Utf8Path,
        destination: &Utf8Path,
    ) -> Result<Utf8PathBuf, EditError> {
        self.reporter.report_stage(EditStage::Locate);
        let files = self.locator.locate(editing_path);
        if files.is_empty() {
            return Err(EditError::NoEditableFiles {
                path: editing_path.to_owned(),
            });
        }

        self.reporter.report_stage(EditStage::MapGraph);
        let framework_path = self.resource_locator.locate_framework()?;
        let project_path = self.project_path(destination);
        let (project, graph) = self.graph_mapper.map(&GraphMapperInput {
            self_path: &self.self_path,
            source_root: editing_path,
            project_path: &project_path,
            files: &files,
            framework_path: &framework_path,
        })?;

        self.reporter.report_stage(EditStage::ApplyProjectMappers);
        let (project, side_effects) = self.project_mapper.map(project)?;

        self.reporter.report_stage(EditStage::ExecuteSideEffects);
        let executed = self.side_effect_executor.execute(&side_effects)?;
        debug!(
            written = executed.written,
            removed = executed.removed,
            unchanged = executed.unchanged,
            "executed side effects"
        );

        self.reporter.report_stage(EditStage::GenerateDescriptor);
        let descriptor = self.descriptor_generator.generate(&project, &graph)?;

        self.reporter.report_stage(EditStage::Write);
        let written = self.writer.write(&descriptor)?;
        debug!(
            written = written.written,
            removed = written.removed,
            unchanged = written.unchanged,
            "wrote project"
        );

        info!(project = %project_path, "generated editable project");
        self.reporter.report_complete(&project_path);
        Ok(project_path)
    }
}
