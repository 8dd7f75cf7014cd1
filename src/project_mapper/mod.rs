//! Ordered transformations of the synthesised project.
//!
//! Each [`ProjectMapper`] is a pure function of the project it receives and
//! returns the (possibly unchanged) project with the side effects it needs.
//! [`SequentialProjectMapper`] folds them left to right: every mapper sees the
//! previous mapper's project, never its side effects, and the side effects of
//! the chain are concatenated in mapper order.

use tracing::debug;

use crate::error::EditError;
use crate::project::Project;
use crate::settings::SchemeSettings;
use crate::side_effects::SideEffect;

mod schemes;

/// A single project transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectMapper {
    /// Add a build scheme for every target that lacks one.
    AutogeneratedSchemes {
        /// Whether the synthesised schemes gather code coverage.
        code_coverage: bool,
    },
}

impl ProjectMapper {
    /// Apply the transformation to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Generation`] when a side effect's content cannot
    /// be produced.
    pub fn map(&self, project: Project) -> Result<(Project, Vec<SideEffect>), EditError> {
        match *self {
            Self::AutogeneratedSchemes { code_coverage } => {
                schemes::autogenerate(project, code_coverage)
            }
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::AutogeneratedSchemes { .. } => "autogenerated schemes",
        }
    }
}

/// An ordered chain of [`ProjectMapper`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialProjectMapper {
    mappers: Vec<ProjectMapper>,
}

impl SequentialProjectMapper {
    /// Chain `mappers` in the given order.
    #[must_use]
    pub const fn new(mappers: Vec<ProjectMapper>) -> Self {
        Self { mappers }
    }

    /// The chain configured by `settings`.
    #[must_use]
    pub fn from_settings(settings: &SchemeSettings) -> Self {
        let mut mappers = Vec::new();
        if settings.autogenerate {
            mappers.push(ProjectMapper::AutogeneratedSchemes {
                code_coverage: settings.code_coverage,
            });
        }
        Self::new(mappers)
    }

    /// The mappers in application order.
    #[must_use]
    pub fn mappers(&self) -> &[ProjectMapper] {
        &self.mappers
    }

    /// Run every mapper in order.
    ///
    /// # Errors
    ///
    /// Returns the first mapper's error; later mappers are not run.
    pub fn map(&self, project: Project) -> Result<(Project, Vec<SideEffect>), EditError> {
        self.mappers.iter().try_fold(
            (project, Vec::new()),
            |(current, mut side_effects), mapper| {
                let (mapped, produced) = mapper.map(current)?;
                debug!(
                    mapper = mapper.name(),
                    side_effects = produced.len(),
                    "applied project mapper"
                );
                side_effects.extend(produced);
                Ok((mapped, side_effects))
            },
        )
    }
}

#[cfg(test)]
mod tests;
