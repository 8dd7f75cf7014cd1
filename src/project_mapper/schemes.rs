//! Synthesis of one build scheme per target.

use crate::error::EditError;
use crate::project::{Project, Scheme};
use crate::side_effects::SideEffect;

/// Add a scheme for every target without one and describe its file.
///
/// Targets that already have a scheme of their name are left alone, so a
/// project whose targets are all covered comes back unchanged with no side
/// effects.
pub(super) fn autogenerate(
    mut project: Project,
    code_coverage: bool,
) -> Result<(Project, Vec<SideEffect>), EditError> {
    let missing: Vec<Scheme> = project
        .targets
        .iter()
        .filter(|target| !project.has_scheme(target.name.as_str()))
        .map(|target| Scheme {
            name: target.name.to_string(),
            build_targets: vec![target.name.clone()],
            test_targets: Vec::new(),
            code_coverage,
            run_action: None,
            autogenerated: true,
        })
        .collect();

    let side_effects = missing
        .iter()
        .map(|scheme| {
            let contents = scheme.render().map_err(|err| EditError::Generation {
                message: format!("cannot render scheme `{}`: {err}", scheme.name),
            })?;
            Ok(SideEffect::write(project.scheme_path(scheme), contents))
        })
        .collect::<Result<Vec<_>, EditError>>()?;

    project.schemes.extend(missing);
    Ok((project, side_effects))
}
