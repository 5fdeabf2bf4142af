// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::config::DependencyGraph;
use crate::errors::BootstrapError;
use crate::traits::ComponentRecord;

/// Compute the execution order of a validated graph.
///
/// Kahn's algorithm where the ready set is a min-heap keyed on declaration
/// position: whenever several packages are free to run, the one declared
/// first goes next. That makes the order stable (no edges means input order)
/// and identical across runs.
///
/// ## Algorithm Complexity
/// - **Time**: O((V + E) log V) for the heap operations
/// - **Space**: O(V) for in-degrees and the heap
///
/// ## Error Conditions
/// - Returns `BootstrapError::Internal` if some packages are never emitted,
///   which means the graph has a cycle validation should have caught
pub fn sort_components(graph: &DependencyGraph) -> Result<Vec<String>, BootstrapError> {
    let components = graph.components();

    let mut in_degree: Vec<usize> = components
        .iter()
        .map(|name| graph.get_dependencies(name).len())
        .collect();

    let positions: HashMap<&str, usize> = components
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(components.len());

    while let Some(Reverse(index)) = ready.pop() {
        let name = &components[index];
        order.push(name.clone());

        for dependent in graph.get_dependents(name) {
            let dependent_index = *positions.get(dependent.as_str()).ok_or_else(|| {
                BootstrapError::Internal(format!(
                    "package '{}' not found in the graph during topological sorting",
                    dependent
                ))
            })?;
            in_degree[dependent_index] -= 1;
            if in_degree[dependent_index] == 0 {
                ready.push(Reverse(dependent_index));
            }
        }
    }

    if order.len() != components.len() {
        return Err(BootstrapError::Internal(
            "dependency graph contains cycles (should have been caught during validation)".into(),
        ));
    }

    Ok(order)
}

/// Rearrange records into `order`, dropping any name not in `order`.
pub fn order_records(records: Vec<ComponentRecord>, order: &[String]) -> Vec<ComponentRecord> {
    let mut by_name: HashMap<String, ComponentRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_name.entry(record.meta.name.clone()).or_insert(record);
    }

    order
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PackageMeta;

    fn meta(name: &str, provides: &[&str], consumes: &[&str]) -> PackageMeta {
        PackageMeta::new(name)
            .with_provides(provides.iter().copied())
            .with_consumes(consumes.iter().copied())
    }

    fn sort(metas: &[PackageMeta]) -> Vec<String> {
        sort_components(&DependencyGraph::from_metas(metas)).unwrap()
    }

    #[test]
    fn test_unconstrained_packages_keep_input_order() {
        let metas = vec![
            meta("c", &[], &[]),
            meta("a", &["x"], &[]),
            meta("b", &[], &[]),
        ];
        assert_eq!(sort(&metas), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_provider_precedes_consumer() {
        let metas = vec![
            meta("web", &["http"], &["db"]),
            meta("db", &["db"], &[]),
        ];
        assert_eq!(sort(&metas), vec!["db", "web"]);
    }

    #[test]
    fn test_ties_broken_by_declaration_order() {
        // logger is free from the start but declared after config
        let metas = vec![
            meta("app", &[], &["cfg", "log"]),
            meta("config", &["cfg"], &[]),
            meta("logger", &["log"], &[]),
            meta("metrics", &[], &[]),
        ];
        assert_eq!(sort(&metas), vec!["config", "logger", "app", "metrics"]);
    }

    #[test]
    fn test_diamond() {
        let metas = vec![
            meta("sink", &[], &["left", "right"]),
            meta("right", &["right"], &["root"]),
            meta("left", &["left"], &["root"]),
            meta("root", &["root"], &[]),
        ];
        assert_eq!(sort(&metas), vec!["root", "right", "left", "sink"]);
    }

    #[test]
    fn test_sort_is_repeatable() {
        let metas = vec![
            meta("e", &[], &["d"]),
            meta("d", &["d"], &["b"]),
            meta("c", &[], &[]),
            meta("b", &["b"], &[]),
            meta("a", &[], &["b"]),
        ];
        let first = sort(&metas);
        for _ in 0..10 {
            assert_eq!(sort(&metas), first);
        }
        assert_eq!(first, vec!["c", "b", "d", "e", "a"]);
    }

    #[test]
    fn test_cycle_is_an_internal_error() {
        let metas = vec![meta("a", &["x"], &["y"]), meta("b", &["y"], &["x"])];
        let result = sort_components(&DependencyGraph::from_metas(&metas));
        assert!(matches!(result, Err(BootstrapError::Internal(_))));
    }

    #[test]
    fn test_order_records() {
        let records: Vec<ComponentRecord> = ["a", "b", "c"]
            .iter()
            .map(|name| {
                ComponentRecord::from_fn(PackageMeta::new(*name), |_meta, _imports, _registrar| {
                    Ok(None)
                })
            })
            .collect();

        let ordered = order_records(records, &["c".to_string(), "a".to_string(), "b".to_string()]);
        let names: Vec<&str> = ordered.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
