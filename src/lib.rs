//! Manifest editor core library.
//!
//! Turns a directory of project manifests, shared helpers and templates into
//! an editable IDE project whose targets are wired so every manifest can see
//! the description framework and every helper. The pipeline is driven by
//! [`editor::ProjectEditor::edit`]:
//!
//! 1. [`locator`] discovers the editable files,
//! 2. [`graph`] builds the project and its target graph,
//! 3. [`project_mapper`] applies the mapper chain,
//! 4. [`side_effects`] applies the chain's file-system side effects,
//! 5. [`descriptor`] lowers the project into a descriptor,
//! 6. [`writer`] persists it.

pub mod cli;
pub mod descriptor;
pub mod editor;
pub mod error;
mod file_io;
pub mod graph;
pub mod hasher;
pub mod locator;
pub mod project;
pub mod project_mapper;
pub mod resource;
pub mod runner;
pub mod settings;
pub mod side_effects;
pub mod status;
pub mod writer;

pub use editor::ProjectEditor;
pub use error::{EditError, GraphInvariantViolation};
