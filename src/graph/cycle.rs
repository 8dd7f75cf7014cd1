//! Ordering checks for the synthetic target graph.
//!
//! Targets are peeled off in name order once every dependency has been
//! peeled (Kahn's algorithm). Unresolved edges are found while the pass is
//! set up; whatever remains afterwards sits on, or depends on, a cycle.

use std::collections::{BTreeMap, VecDeque};

use super::{SyntheticTarget, TargetName};
use crate::error::GraphInvariantViolation;

type Targets = BTreeMap<TargetName, SyntheticTarget>;

/// Check that every edge resolves and that the edges are acyclic.
///
/// The first dangling edge is reported in name order. A cycle is traced from
/// the smallest target left unpeeled and rotated to start at its smallest
/// name.
pub(super) fn check(targets: &Targets) -> Result<(), GraphInvariantViolation> {
    let mut unresolved: BTreeMap<&TargetName, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&TargetName, Vec<&TargetName>> = BTreeMap::new();
    for target in targets.values() {
        for dependency in &target.dependencies {
            if !targets.contains_key(dependency) {
                return Err(GraphInvariantViolation::DanglingDependency {
                    target: target.name.clone(),
                    dependency: dependency.clone(),
                });
            }
            dependents.entry(dependency).or_default().push(&target.name);
        }
        unresolved.insert(&target.name, target.dependencies.len());
    }

    let mut ready: VecDeque<&TargetName> = unresolved
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();
    while let Some(name) = ready.pop_front() {
        unresolved.remove(name);
        for &dependent in dependents.get(name).into_iter().flatten() {
            if let Some(count) = unresolved.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push_back(dependent);
                }
            }
        }
    }

    let Some(&start) = unresolved.keys().next() else {
        return Ok(());
    };
    let cycle = trace_cycle(targets, &unresolved, start).unwrap_or_else(|| {
        unresolved.keys().map(|name| (*name).clone()).collect()
    });
    Err(GraphInvariantViolation::Cycle { cycle })
}

/// Follow the smallest unpeeled dependency from `start` until a name repeats.
fn trace_cycle(
    targets: &Targets,
    unpeeled: &BTreeMap<&TargetName, usize>,
    start: &TargetName,
) -> Option<Vec<TargetName>> {
    let mut path: Vec<&TargetName> = Vec::new();
    let mut current = start;
    loop {
        if let Some(position) = path.iter().position(|seen| *seen == current) {
            let cycle = path.split_off(position).into_iter().cloned().collect();
            return Some(rotate_to_smallest(cycle));
        }
        path.push(current);
        current = targets
            .get(current)?
            .dependencies
            .iter()
            .find(|dependency| unpeeled.contains_key(dependency))?;
    }
}

/// Rotate an open cycle to start at its smallest name and close it.
fn rotate_to_smallest(mut cycle: Vec<TargetName>) -> Vec<TargetName> {
    if let Some(start) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| *name)
        .map(|(position, _)| position)
    {
        cycle.rotate_left(start);
    }
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TargetKind;
    use crate::locator::EditableRole;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn name(value: &str) -> TargetName {
        TargetName::new(value)
    }

    fn targets(edges: &[(&str, &[&str])]) -> Targets {
        edges
            .iter()
            .map(|(from, deps)| {
                let mut target = SyntheticTarget::new(
                    name(from),
                    TargetKind::Editable(EditableRole::Manifest),
                    Utf8PathBuf::from(*from),
                );
                target.dependencies = deps.iter().map(|d| name(d)).collect();
                (name(from), target)
            })
            .collect()
    }

    fn cycle_of(result: Result<(), GraphInvariantViolation>) -> Vec<String> {
        match result {
            Err(GraphInvariantViolation::Cycle { cycle }) => {
                cycle.iter().map(|n| n.as_str().to_owned()).collect()
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[rstest]
    #[case::self_edge(&[("a", &["a"][..])][..], &["a", "a"][..])]
    #[case::two_nodes(&[("a", &["b"][..]), ("b", &["a"][..])][..], &["a", "b", "a"][..])]
    #[case::reverse_direction(
        &[("a", &["c"][..]), ("b", &["a"][..]), ("c", &["b"][..])][..],
        &["a", "c", "b", "a"][..]
    )]
    fn reports_cycles_from_the_smallest_name(
        #[case] edges: &[(&str, &[&str])],
        #[case] expected: &[&str],
    ) {
        assert_eq!(cycle_of(check(&targets(edges))), expected);
    }

    #[rstest]
    fn cycle_reached_through_an_acyclic_prefix_excludes_the_prefix() {
        let graph = targets(&[("a", &["c"]), ("c", &["d"]), ("d", &["c"])]);
        assert_eq!(cycle_of(check(&graph)), ["c", "d", "c"]);
    }

    #[rstest]
    fn diamond_is_acyclic() {
        let graph = targets(&[
            ("manifest", &["framework", "helper"]),
            ("template", &["framework", "helper"]),
            ("helper", &[]),
            ("framework", &[]),
        ]);
        assert_eq!(check(&graph), Ok(()));
    }

    #[rstest]
    fn dangling_edges_are_reported_before_cycles() {
        let graph = targets(&[("a", &["b"]), ("b", &["a"]), ("c", &["ghost"])]);
        assert_eq!(
            check(&graph),
            Err(GraphInvariantViolation::DanglingDependency {
                target: name("c"),
                dependency: name("ghost"),
            })
        );
    }

    #[rstest]
    fn rotation_closes_the_cycle() {
        let rotated = rotate_to_smallest(vec![name("c"), name("a"), name("b")]);
        assert_eq!(rotated, vec![name("a"), name("b"), name("c"), name("a")]);
    }
}
