//! Output mode detection.
//!
//! Accessible (static text) output is forced with `--accessible true`, or
//! auto-detected from `NO_COLOR` (any value) and `TERM=dumb`.

use std::env;

/// How progress is presented on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Static labelled lines, suitable for screen readers and CI logs.
    Accessible,
    /// Persistent progress lines.
    Standard,
}

/// Resolve the output mode from the CLI flag and the process environment.
#[must_use]
pub fn resolve(explicit: Option<bool>) -> OutputMode {
    resolve_with(explicit, |key| env::var(key).ok())
}

/// Variant of [`resolve`] reading the environment through `read_env`.
///
/// # Examples
///
/// ```
/// use manifest_editor::runner::output_mode::{OutputMode, resolve_with};
///
/// let mode = resolve_with(None, |key| (key == "TERM").then(|| "dumb".to_owned()));
/// assert_eq!(mode, OutputMode::Accessible);
/// ```
#[must_use]
pub fn resolve_with<F>(explicit: Option<bool>, read_env: F) -> OutputMode
where
    F: Fn(&str) -> Option<String>,
{
    match explicit {
        Some(true) => OutputMode::Accessible,
        Some(false) => OutputMode::Standard,
        None if read_env("NO_COLOR").is_some() => OutputMode::Accessible,
        None if read_env("TERM").as_deref() == Some("dumb") => OutputMode::Accessible,
        None => OutputMode::Standard,
    }
}
