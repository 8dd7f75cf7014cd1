//! Editing pipeline status reporting.
//!
//! The editor announces each [`EditStage`] to a [`StatusReporter`] as it
//! starts. [`AccessibleReporter`] writes one labelled line per stage,
//! [`IndicatifReporter`] keeps one persistent line per stage using
//! `indicatif::MultiProgress`, and [`SilentReporter`] stays quiet.

use std::io::{self, Write};
use std::sync::Mutex;

use camino::Utf8Path;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Stages of the editing pipeline in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditStage {
    /// Stage 1: discover editable files.
    Locate = 1,
    /// Stage 2: build the project and its target graph.
    MapGraph = 2,
    /// Stage 3: run the project mapper chain.
    ApplyProjectMappers = 3,
    /// Stage 4: apply the mappers' side effects.
    ExecuteSideEffects = 4,
    /// Stage 5: lower the project into a descriptor.
    GenerateDescriptor = 5,
    /// Stage 6: write the project bundle.
    Write = 6,
}

/// The total number of stages reported during an edit.
pub const EDIT_STAGE_COUNT: u32 = 6;

impl EditStage {
    /// All stages in execution order.
    pub const ALL: [Self; 6] = [
        Self::Locate,
        Self::MapGraph,
        Self::ApplyProjectMappers,
        Self::ExecuteSideEffects,
        Self::GenerateDescriptor,
        Self::Write,
    ];

    /// 1-based position of the stage.
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Locate => "Locating editable files",
            Self::MapGraph => "Mapping the project graph",
            Self::ApplyProjectMappers => "Applying project mappers",
            Self::ExecuteSideEffects => "Executing side effects",
            Self::GenerateDescriptor => "Generating the project descriptor",
            Self::Write => "Writing the project",
        }
    }

    /// `Stage i/n: description` label.
    #[must_use]
    pub fn label(self) -> String {
        format!(
            "Stage {}/{EDIT_STAGE_COUNT}: {}",
            self.index(),
            self.description()
        )
    }
}

const _: () = assert!(
    EditStage::ALL.len() == EDIT_STAGE_COUNT as usize,
    "EditStage::ALL length must equal EDIT_STAGE_COUNT"
);

/// Report editing progress to the user.
pub trait StatusReporter {
    /// Announce that `stage` has started.
    fn report_stage(&self, stage: EditStage);

    /// Announce that the project at `project_path` is ready.
    fn report_complete(&self, project_path: &Utf8Path);
}

/// Accessible reporter: writes static, labelled lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibleReporter;

impl StatusReporter for AccessibleReporter {
    fn report_stage(&self, stage: EditStage) {
        // Status output failures must not abort the edit.
        drop(writeln!(io::stderr(), "{}", stage.label()));
    }

    fn report_complete(&self, project_path: &Utf8Path) {
        drop(writeln!(io::stderr(), "Generated {project_path}"));
    }
}

/// Silent reporter: emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn report_stage(&self, _stage: EditStage) {}
    fn report_complete(&self, _project_path: &Utf8Path) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StageState {
    Pending,
    Running,
    Done,
    Failed,
}

impl StageState {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "[ ]",
            Self::Running => "[~]",
            Self::Done => "[x]",
            Self::Failed => "[!]",
        }
    }
}

#[derive(Debug)]
struct IndicatifState {
    progress: MultiProgress,
    bars: Vec<ProgressBar>,
    running: Option<EditStage>,
    completed: bool,
    is_hidden: bool,
}

/// Standard reporter backed by `indicatif::MultiProgress`.
#[derive(Debug)]
pub struct IndicatifReporter {
    state: Mutex<IndicatifState>,
}

impl IndicatifReporter {
    /// Construct a reporter with one persistent line per stage.
    #[must_use]
    pub fn new() -> Self {
        let progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        progress.set_move_cursor(false);
        let style = ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bars = EditStage::ALL
            .iter()
            .map(|stage| {
                let bar = progress.add(ProgressBar::new(1));
                bar.set_style(style.clone());
                bar.set_message(summary(StageState::Pending, *stage));
                bar
            })
            .collect();

        Self {
            state: Mutex::new(IndicatifState {
                is_hidden: progress.is_hidden(),
                progress,
                bars,
                running: None,
                completed: false,
            }),
        }
    }

    fn set_stage_state(state: &IndicatifState, stage: EditStage, stage_state: StageState) {
        let message = summary(stage_state, stage);
        if state.is_hidden {
            if stage_state != StageState::Pending {
                drop(writeln!(io::stderr(), "{message}"));
            }
            return;
        }
        let Some(bar) = usize::try_from(stage.index() - 1)
            .ok()
            .and_then(|index| state.bars.get(index))
        else {
            return;
        };
        if stage_state == StageState::Running {
            bar.set_message(message);
        } else {
            bar.finish_with_message(message);
        }
    }
}

fn summary(state: StageState, stage: EditStage) -> String {
    format!("{} {}", state.as_str(), stage.label())
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IndicatifReporter {
    fn drop(&mut self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if state.completed {
            return;
        }
        if let Some(stage) = state.running.take() {
            Self::set_stage_state(&state, stage, StageState::Failed);
        }
        drop(state.progress.clear());
    }
}

impl StatusReporter for IndicatifReporter {
    fn report_stage(&self, stage: EditStage) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = state.running
            && previous != stage
        {
            Self::set_stage_state(&state, previous, StageState::Done);
        }
        Self::set_stage_state(&state, stage, StageState::Running);
        state.running = Some(stage);
    }

    fn report_complete(&self, project_path: &Utf8Path) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(stage) = state.running.take() {
            Self::set_stage_state(&state, stage, StageState::Done);
        }
        state.completed = true;
        drop(writeln!(io::stderr(), "Generated {project_path}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EditStage::Locate, 1)]
    #[case(EditStage::MapGraph, 2)]
    #[case(EditStage::ApplyProjectMappers, 3)]
    #[case(EditStage::ExecuteSideEffects, 4)]
    #[case(EditStage::GenerateDescriptor, 5)]
    #[case(EditStage::Write, 6)]
    fn stages_are_numbered_in_order(#[case] stage: EditStage, #[case] expected: u32) {
        assert_eq!(stage.index(), expected);
        assert!(stage.label().starts_with(&format!("Stage {expected}/6: ")));
    }

    #[rstest]
    fn all_lists_stages_in_order() {
        let indices: Vec<u32> = EditStage::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[rstest]
    fn summary_prefixes_state_marker() {
        assert_eq!(
            summary(StageState::Done, EditStage::Write),
            "[x] Stage 6/6: Writing the project"
        );
    }

    #[rstest]
    fn indicatif_reporter_tracks_running_stage() {
        let reporter = IndicatifReporter::new();
        reporter.report_stage(EditStage::Locate);
        reporter.report_stage(EditStage::MapGraph);
        {
            let state = reporter.state.lock().expect("lock");
            assert_eq!(state.running, Some(EditStage::MapGraph));
        }
        reporter.report_complete(Utf8Path::new("/out/Manifests.editproj"));
        let state = reporter.state.lock().expect("lock");
        assert!(state.completed);
        assert_eq!(state.running, None);
    }
}
