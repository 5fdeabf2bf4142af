// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pre-flight validation of a package set.
//!
//! Every check here runs before any setup routine executes, so a broken
//! package set never gets partially started.
//!
//! # Validation Pipeline
//!
//! 1. **Non-empty input**: at least one package
//! 2. **Unique names**: package names are the graph's node keys
//! 3. **Unique provisions**: a capability has exactly one provider
//! 4. **Missing dependencies**: every consumed capability is provided somewhere
//! 5. **Cycle detection**: DFS over the provider -> consumer relation
//!
//! Cycle detection only makes sense on a graph whose edges all resolve, so the
//! missing-dependency check runs first. The first failing check wins.
//!
//! ## Cycle Detection Algorithm
//! Uses **Depth-First Search (DFS) with recursion stack**:
//! - **Time Complexity**: O(V + E) where V = packages, E = capability edges
//! - **Space Complexity**: O(V) for visited set and recursion stack
//! - **Detection Method**: a neighbour already on the recursion stack is a back edge
//!
//! Unlike a stop-at-first-cycle search, the DFS keeps going after a back edge so
//! every independent cycle gets at least one representative path.

use std::collections::{HashMap, HashSet};

use crate::config::DependencyGraph;
use crate::errors::{BootstrapError, MissingCapability};
use crate::observability::messages::validation::{
    CyclicDependencyDetected, DuplicatePackageName, DuplicateProvision, MissingProvider,
    ValidationPassed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ComponentRecord;

/// Validate a package set and the graph built from it.
///
/// # Returns
///
/// * `Ok(())` - the set can be sorted and executed
/// * `Err(BootstrapError)` - the first failing check
///
/// # Examples
///
/// ```
/// use the_dipper::config::{validate_dependency_graph, DependencyGraph};
/// use the_dipper::errors::BootstrapError;
/// use the_dipper::traits::{ComponentRecord, PackageMeta};
///
/// let records = vec![ComponentRecord::from_fn(
///     PackageMeta::new("web").with_consumes(["db"]),
///     |_meta, _imports, _registrar| Ok(None),
/// )];
/// let graph = DependencyGraph::build(&records);
///
/// match validate_dependency_graph(&records, &graph) {
///     Err(BootstrapError::MissingDependency { missing }) => {
///         assert_eq!(missing[0].capability, "db");
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub fn validate_dependency_graph(
    records: &[ComponentRecord],
    graph: &DependencyGraph,
) -> Result<(), BootstrapError> {
    if records.is_empty() {
        return Err(BootstrapError::NoComponents);
    }

    validate_unique_names(records)?;
    validate_unique_provisions(records, graph)?;

    let missing = detect_missing_dependencies(records, graph);
    if !missing.is_empty() {
        for entry in &missing {
            let consumers: Vec<&str> = entry.consumers.iter().map(String::as_str).collect();
            MissingProvider {
                capability: &entry.capability,
                consumers: &consumers,
            }
            .log();
        }
        return Err(BootstrapError::MissingDependency { missing });
    }

    let cycles = detect_cycles(graph);
    if !cycles.is_empty() {
        for cycle in &cycles {
            let path: Vec<&str> = cycle.iter().map(String::as_str).collect();
            CyclicDependencyDetected { cycle: &path }.log();
        }
        return Err(BootstrapError::CircularDependency { cycles });
    }

    ValidationPassed {
        package_count: graph.len(),
        edge_count: graph.edge_count(),
    }
    .log();

    Ok(())
}

fn validate_unique_names(records: &[ComponentRecord]) -> Result<(), BootstrapError> {
    let mut seen = HashSet::new();

    for record in records {
        if !seen.insert(record.name()) {
            DuplicatePackageName {
                package: record.name(),
            }
            .log();
            return Err(BootstrapError::DuplicateComponent {
                component: record.name().to_string(),
            });
        }
    }

    Ok(())
}

/// Every capability has exactly one package declaring it in `provides`.
fn validate_unique_provisions(
    records: &[ComponentRecord],
    graph: &DependencyGraph,
) -> Result<(), BootstrapError> {
    for record in records {
        for capability in &record.meta.provides {
            let providers = graph.providers().providers(capability);
            if providers.len() > 1 {
                let names: Vec<&str> = providers.iter().map(String::as_str).collect();
                DuplicateProvision {
                    capability,
                    providers: &names,
                }
                .log();
                return Err(BootstrapError::DuplicateProvision {
                    capability: capability.clone(),
                    providers: providers.to_vec(),
                });
            }
        }
    }

    Ok(())
}

/// `consumed - provided`, each missing capability listed once with every
/// consumer, both in declaration order.
pub fn detect_missing_dependencies(
    records: &[ComponentRecord],
    graph: &DependencyGraph,
) -> Vec<MissingCapability> {
    let mut missing: Vec<MissingCapability> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        for capability in &record.meta.consumes {
            if graph.providers().contains(capability) {
                continue;
            }

            let position = *positions.entry(capability.as_str()).or_insert_with(|| {
                missing.push(MissingCapability {
                    capability: capability.clone(),
                    consumers: Vec::new(),
                });
                missing.len() - 1
            });

            let consumers = &mut missing[position].consumers;
            if !consumers.iter().any(|c| c == record.name()) {
                consumers.push(record.name().to_string());
            }
        }
    }

    missing
}

/// Find cycles in the provider -> consumer relation.
///
/// Uses the **"Three Colors" DFS approach**:
/// - **White (unvisited)**: Node not yet explored
/// - **Gray (in recursion stack)**: Node currently being explored
/// - **Black (visited)**: Node fully explored
///
/// Roots are taken in declaration order and neighbours in edge order, so the
/// reported paths are the same on every run. Each path is closed, e.g.
/// `[a, b, a]`; a self-consuming package yields `[a, a]`.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for component in graph.components() {
        if !visited.contains(component.as_str()) {
            dfs_cycle_detection(
                component,
                graph,
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

/// Depth-first search with cycle detection and path tracking.
///
/// ## Cycle Path Construction
/// When a back edge is found (current node -> gray node):
/// 1. Find position of gray node in current path
/// 2. Extract path segment from gray node to current position
/// 3. Add back edge to close the cycle
///
/// ## Example Execution
/// For graph A -> B -> C -> A:
/// 1. Start DFS at A: path = [A], rec_stack = {A}
/// 2. Visit B: path = [A, B], rec_stack = {A, B}
/// 3. Visit C: path = [A, B, C], rec_stack = {A, B, C}
/// 4. Try to visit A: A is in rec_stack -> cycle [A, B, C, A]
fn dfs_cycle_detection<'g>(
    node: &'g str,
    graph: &'g DependencyGraph,
    visited: &mut HashSet<&'g str>,
    rec_stack: &mut HashSet<&'g str>,
    path: &mut Vec<&'g str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    for neighbor in graph.get_dependents(node) {
        let neighbor = neighbor.as_str();
        if !visited.contains(neighbor) {
            dfs_cycle_detection(neighbor, graph, visited, rec_stack, path, cycles);
        } else if rec_stack.contains(neighbor) {
            if let Some(cycle_start) = path.iter().position(|x| *x == neighbor) {
                let mut cycle: Vec<String> =
                    path[cycle_start..].iter().map(|s| s.to_string()).collect();
                cycle.push(neighbor.to_string());
                cycles.push(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PackageMeta;

    fn create_test_record(name: &str, provides: Vec<&str>, consumes: Vec<&str>) -> ComponentRecord {
        ComponentRecord::from_fn(
            PackageMeta::new(name)
                .with_provides(provides)
                .with_consumes(consumes),
            |_meta, _imports, _registrar| Ok(None),
        )
    }

    fn validate(records: &[ComponentRecord]) -> Result<(), BootstrapError> {
        let graph = DependencyGraph::build(records);
        validate_dependency_graph(records, &graph)
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(validate(&[]), Err(BootstrapError::NoComponents)));
    }

    #[test]
    fn test_valid_single_package() {
        let records = vec![create_test_record("a", vec![], vec![])];
        assert!(validate(&records).is_ok());
    }

    #[test]
    fn test_valid_linear_chain() {
        let records = vec![
            create_test_record("a", vec!["x"], vec![]),
            create_test_record("b", vec!["y"], vec!["x"]),
            create_test_record("c", vec![], vec!["y"]),
        ];
        assert!(validate(&records).is_ok());
    }

    #[test]
    fn test_valid_diamond_dependency() {
        let records = vec![
            create_test_record("a", vec!["root"], vec![]),
            create_test_record("b", vec!["left"], vec!["root"]),
            create_test_record("c", vec!["right"], vec!["root"]),
            create_test_record("d", vec![], vec!["left", "right"]),
        ];
        assert!(validate(&records).is_ok());
    }

    #[test]
    fn test_duplicate_package_names() {
        let records = vec![
            create_test_record("a", vec![], vec![]),
            create_test_record("a", vec![], vec![]),
        ];

        match validate(&records) {
            Err(BootstrapError::DuplicateComponent { component }) => assert_eq!(component, "a"),
            other => panic!("expected DuplicateComponent, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_provision_is_a_configuration_error() {
        let records = vec![
            create_test_record("primary", vec!["log"], vec![]),
            create_test_record("secondary", vec!["log"], vec![]),
        ];

        match validate(&records) {
            Err(BootstrapError::DuplicateProvision {
                capability,
                providers,
            }) => {
                assert_eq!(capability, "log");
                assert_eq!(providers, vec!["primary", "secondary"]);
            }
            other => panic!("expected DuplicateProvision, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_dependency_names_capability_and_consumers() {
        let records = vec![
            create_test_record("a", vec!["x"], vec![]),
            create_test_record("b", vec![], vec!["z", "x"]),
            create_test_record("c", vec![], vec!["z", "w"]),
        ];

        match validate(&records) {
            Err(BootstrapError::MissingDependency { missing }) => {
                assert_eq!(missing.len(), 2);
                assert_eq!(missing[0].capability, "z");
                assert_eq!(missing[0].consumers, vec!["b", "c"]);
                assert_eq!(missing[1].capability, "w");
                assert_eq!(missing[1].consumers, vec!["c"]);
            }
            other => panic!("expected MissingDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_dependency_checked_before_cycles() {
        let records = vec![
            create_test_record("a", vec!["x"], vec!["y"]),
            create_test_record("b", vec!["y"], vec!["x", "ghost"]),
        ];

        assert!(matches!(
            validate(&records),
            Err(BootstrapError::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_simple_cycle_names_both_packages() {
        let records = vec![
            create_test_record("a", vec!["x"], vec!["y"]),
            create_test_record("b", vec!["y"], vec!["x"]),
        ];

        match validate(&records) {
            Err(error @ BootstrapError::CircularDependency { .. }) => {
                let components = error.components();
                assert!(components.contains(&"a"));
                assert!(components.contains(&"b"));
            }
            other => panic!("expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_self_consumption_cycle() {
        let records = vec![create_test_record("a", vec!["x"], vec!["x"])];

        match validate(&records) {
            Err(BootstrapError::CircularDependency { cycles }) => {
                assert_eq!(cycles, vec![vec!["a".to_string(), "a".to_string()]]);
            }
            other => panic!("expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_complex_cycle_path() {
        // a feeds b, b -> c -> d -> b is the cycle
        let records = vec![
            create_test_record("a", vec!["pa"], vec![]),
            create_test_record("b", vec!["pb"], vec!["pa", "pd"]),
            create_test_record("c", vec!["pc"], vec!["pb"]),
            create_test_record("d", vec!["pd"], vec!["pc"]),
        ];
        let graph = DependencyGraph::build(&records);

        let cycles = detect_cycles(&graph);
        assert_eq!(cycles, vec![vec!["b", "c", "d", "b"]]);
    }

    #[test]
    fn test_independent_cycles_are_all_reported() {
        let records = vec![
            create_test_record("a", vec!["pa"], vec!["pb"]),
            create_test_record("b", vec!["pb"], vec!["pa"]),
            create_test_record("c", vec!["pc"], vec!["pd"]),
            create_test_record("d", vec!["pd"], vec!["pc"]),
        ];
        let graph = DependencyGraph::build(&records);

        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0], vec!["a", "b", "a"]);
        assert_eq!(cycles[1], vec!["c", "d", "c"]);
    }
}
