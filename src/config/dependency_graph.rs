// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::traits::{ComponentRecord, PackageMeta};

/// Capability name -> packages that declare it in `provides`, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ProviderIndex(pub HashMap<String, Vec<String>>);

impl ProviderIndex {
    /// Build the index from package metadata.
    pub fn from_metas<'a, I>(metas: I) -> Self
    where
        I: IntoIterator<Item = &'a PackageMeta>,
    {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for meta in metas {
            for capability in &meta.provides {
                let providers = index.entry(capability.clone()).or_default();
                if !providers.contains(&meta.name) {
                    providers.push(meta.name.clone());
                }
            }
        }
        Self(index)
    }

    /// The provider used for graph edges: the first package to declare it.
    pub fn provider(&self, capability: &str) -> Option<&str> {
        self.0
            .get(capability)
            .and_then(|providers| providers.first())
            .map(String::as_str)
    }

    /// Every package declaring the capability.
    pub fn providers(&self, capability: &str) -> &[String] {
        self.0.get(capability).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.0.contains_key(capability)
    }
}

/// Must-run-after relation between packages derived from provides/consumes.
///
/// Edges point from a provider to each package consuming one of its
/// capabilities, i.e. in execution order. A package consuming its own
/// capability gets a self-edge so the cycle check can report it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    order: Vec<String>,
    dependents: HashMap<String, Vec<String>>,
    dependencies: HashMap<String, Vec<String>>,
    providers: ProviderIndex,
}

impl DependencyGraph {
    /// Build the graph for a list of package records.
    pub fn build(records: &[ComponentRecord]) -> Self {
        Self::from_metas(records.iter().map(|record| &record.meta))
    }

    /// Build the graph from package metadata in declaration order.
    pub fn from_metas<'a, I>(metas: I) -> Self
    where
        I: IntoIterator<Item = &'a PackageMeta>,
    {
        let metas: Vec<&PackageMeta> = metas.into_iter().collect();

        let mut graph = Self {
            providers: ProviderIndex::from_metas(metas.iter().copied()),
            ..Self::default()
        };

        // Keep the first declaration of a duplicated name; validation reports it.
        let mut unique = Vec::with_capacity(metas.len());
        for meta in metas {
            if graph.dependents.contains_key(&meta.name) {
                continue;
            }
            graph.order.push(meta.name.clone());
            graph.dependents.insert(meta.name.clone(), Vec::new());
            graph.dependencies.insert(meta.name.clone(), Vec::new());
            unique.push(meta);
        }

        for meta in unique {
            for capability in &meta.consumes {
                // Unprovided capabilities produce no edge; validation reports them.
                if let Some(provider) = graph.providers.provider(capability).map(str::to_string) {
                    graph.add_edge(&provider, &meta.name);
                }
            }
        }

        graph
    }

    /// Package names in declaration order.
    pub fn components(&self) -> &[String] {
        &self.order
    }

    /// Position of a package in declaration order.
    pub fn index_of(&self, component: &str) -> Option<usize> {
        self.order.iter().position(|name| name == component)
    }

    /// Packages that must run after `component`.
    pub fn get_dependents(&self, component: &str) -> &[String] {
        self.dependents
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Packages that must run before `component`.
    pub fn get_dependencies(&self, component: &str) -> &[String] {
        self.dependencies
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn providers(&self) -> &ProviderIndex {
        &self.providers
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn add_edge(&mut self, provider: &str, consumer: &str) {
        let dependents = self.dependents.entry(provider.to_string()).or_default();
        if dependents.iter().any(|d| d == consumer) {
            return;
        }
        dependents.push(consumer.to_string());
        self.dependencies
            .entry(consumer.to_string())
            .or_default()
            .push(provider.to_string());
    }
}
