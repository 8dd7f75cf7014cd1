//! Tests for the project mapper chain.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};

use super::*;
use crate::graph::TargetName;
use crate::locator::EditableRole;
use crate::project::{Scheme, Target};
use crate::side_effects::{FileDescriptor, FileState};

#[fixture]
fn project() -> Project {
    let target = |name: &str, role| Target {
        name: TargetName::new(name),
        role,
        source: Utf8PathBuf::from(format!("/work/{name}")),
    };
    Project {
        name: "Manifests".to_owned(),
        source_root: Utf8PathBuf::from("/work"),
        project_path: Utf8PathBuf::from("/out/Manifests.editproj"),
        base_settings: BTreeMap::new(),
        targets: vec![
            target("Helpers/A.swift", EditableRole::Helper),
            target("Manifests/Project.swift", EditableRole::Manifest),
        ],
        schemes: Vec::new(),
    }
}

fn autogenerated(code_coverage: bool) -> ProjectMapper {
    ProjectMapper::AutogeneratedSchemes { code_coverage }
}

#[rstest]
fn schemes_are_added_for_each_target(project: Project) {
    let (mapped, side_effects) = autogenerated(false).map(project).expect("map");

    let names: Vec<&str> = mapped.schemes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Helpers/A.swift", "Manifests/Project.swift"]);
    assert!(mapped.schemes.iter().all(|s| s.autogenerated && !s.code_coverage));

    let paths: Vec<&str> = side_effects.iter().map(|e| e.path().as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/out/Manifests.editproj/schemes/Helpers/A.swift.json",
            "/out/Manifests.editproj/schemes/Manifests/Project.swift.json",
        ]
    );
}

#[rstest]
fn side_effect_content_is_the_rendered_scheme(project: Project) {
    let (mapped, side_effects) = autogenerated(true).map(project).expect("map");
    let Some(SideEffect::File(FileDescriptor {
        state: FileState::Present(contents),
        ..
    })) = side_effects.first()
    else {
        panic!("expected a file write, got {side_effects:?}");
    };
    let expected = mapped.schemes[0].render().expect("render");
    assert_eq!(contents, &expected);
    assert!(mapped.schemes[0].code_coverage);
}

#[rstest]
fn covered_project_is_returned_unchanged(project: Project) {
    let (once, _) = autogenerated(false).map(project).expect("first map");
    let (twice, side_effects) = autogenerated(false).map(once.clone()).expect("second map");
    assert_eq!(twice, once);
    assert!(side_effects.is_empty());
}

#[rstest]
fn existing_schemes_are_kept(mut project: Project) {
    project.schemes.push(Scheme {
        name: "Helpers/A.swift".to_owned(),
        build_targets: vec![TargetName::new("Helpers/A.swift")],
        test_targets: Vec::new(),
        code_coverage: true,
        run_action: None,
        autogenerated: false,
    });
    let (mapped, side_effects) = autogenerated(false).map(project).expect("map");
    assert_eq!(mapped.schemes.len(), 2);
    assert!(mapped.schemes[0].code_coverage, "user scheme replaced");
    assert_eq!(side_effects.len(), 1);
}

#[rstest]
#[case(SchemeSettings { autogenerate: true, code_coverage: false }, vec![autogenerated(false)])]
#[case(SchemeSettings { autogenerate: true, code_coverage: true }, vec![autogenerated(true)])]
#[case(SchemeSettings { autogenerate: false, code_coverage: true }, vec![])]
fn chain_follows_settings(#[case] settings: SchemeSettings, #[case] expected: Vec<ProjectMapper>) {
    assert_eq!(SequentialProjectMapper::from_settings(&settings).mappers(), expected.as_slice());
}

#[rstest]
fn empty_chain_is_identity(project: Project) {
    let chain = SequentialProjectMapper::default();
    let (mapped, side_effects) = chain.map(project.clone()).expect("map");
    assert_eq!(mapped, project);
    assert!(side_effects.is_empty());
}

#[rstest]
fn later_mappers_see_earlier_projects_only(project: Project) {
    let chain = SequentialProjectMapper::new(vec![autogenerated(false), autogenerated(true)]);
    let (mapped, side_effects) = chain.map(project).expect("map");
    assert_eq!(side_effects.len(), 2, "second mapper should be a no-op");
    assert!(mapped.schemes.iter().all(|s| !s.code_coverage));
}
