// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::consts::DEFAULT_ENTRY_POINT;
use crate::engine::Registrar;
use crate::errors::LoaderError;
use crate::observability::messages::loader::EntryPointResolved;
use crate::observability::messages::StructuredLog;
use crate::traits::{setup_fn, Imports, PackageMeta, Setup, SetupResult};

/// Named setup routines that config entries resolve against.
///
/// Keys are either bare (`"index"`, `"calculator"`) or namespaced by package
/// (`"calculator/index"`); namespaced keys win.
#[derive(Clone, Default)]
pub struct SetupRegistry {
    setups: HashMap<String, Arc<dyn Setup>>,
}

impl SetupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, setup: Arc<dyn Setup>) -> &mut Self {
        self.setups.insert(name.into(), setup);
        self
    }

    /// Register a closure under `name`.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&PackageMeta, Imports, Registrar) -> SetupResult + Send + Sync + 'static,
    {
        self.register(name, setup_fn(f))
    }

    /// Builder form of [`SetupRegistry::register_fn`].
    pub fn with_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&PackageMeta, Imports, Registrar) -> SetupResult + Send + Sync + 'static,
    {
        self.register_fn(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Setup>> {
        self.setups.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.setups.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.setups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.setups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setups.is_empty()
    }

    /// Find the setup routine for a package.
    ///
    /// Candidates in priority order are the package's `main`, `"index"` and
    /// the package name. Each is looked up namespaced first, then bare.
    pub fn resolve(&self, meta: &PackageMeta) -> Result<Arc<dyn Setup>, LoaderError> {
        let mut tried = Vec::new();

        for candidate in entry_point_candidates(meta) {
            for key in [format!("{}/{}", meta.name, candidate), candidate] {
                if tried.contains(&key) {
                    continue;
                }
                if let Some(setup) = self.setups.get(&key) {
                    EntryPointResolved {
                        package: &meta.name,
                        entry_point: &key,
                    }
                    .log();
                    return Ok(setup.clone());
                }
                tried.push(key);
            }
        }

        Err(LoaderError::EntryPoint {
            package: meta.name.clone(),
            tried,
        })
    }
}

impl fmt::Debug for SetupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupRegistry")
            .field("entry_points", &self.names())
            .finish()
    }
}

fn entry_point_candidates(meta: &PackageMeta) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(3);
    let main = meta.main.as_deref().filter(|m| !m.is_empty());
    for candidate in main.into_iter().chain([DEFAULT_ENTRY_POINT, meta.name.as_str()]) {
        if !candidates.iter().any(|c| c == candidate) {
            candidates.push(candidate.to_string());
        }
    }
    candidates
}
