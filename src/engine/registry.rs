// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::BootstrapError;
use crate::traits::component::downcast_service;
use crate::traits::{Exports, Imports, Service};

/// Capability name -> registered value, plus which package wrote each key.
///
/// Only grows: keys are added, never removed, and a key owned by one package
/// can't be written by another.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Service>,
    owners: HashMap<String, String>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    /// Typed access; `None` if missing or of another type.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.services.get(name).and_then(downcast_service::<T>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// The package that registered `name`.
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// Capability names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Snapshot of the entries a package consumes.
    pub(crate) fn imports_for(&self, consumes: &[String]) -> Imports {
        let services = consumes
            .iter()
            .filter_map(|name| {
                self.services
                    .get(name)
                    .map(|service| (name.clone(), service.clone()))
            })
            .collect();
        Imports::new(services)
    }

    /// Merge a batch on behalf of `package`.
    ///
    /// The batch is rejected as a whole if any key belongs to another package.
    /// Returns the keys written, sorted.
    pub(crate) fn merge(
        &mut self,
        package: &str,
        exports: Exports,
    ) -> Result<Vec<String>, BootstrapError> {
        for name in exports.keys() {
            if let Some(owner) = self.owners.get(name) {
                if owner != package {
                    return Err(BootstrapError::RegistryConflict {
                        capability: name.clone(),
                        owner: owner.clone(),
                        component: package.to_string(),
                    });
                }
            }
        }

        let mut written = Vec::with_capacity(exports.len());
        for (name, service) in exports {
            self.owners.insert(name.clone(), package.to_string());
            self.services.insert(name.clone(), service);
            written.push(name);
        }
        written.sort_unstable();

        Ok(written)
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("service_count", &self.services.len())
            .field("services", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_records_owner_and_values() {
        let mut registry = ServiceRegistry::new();
        let written = registry
            .merge("db", Exports::new().with("pool", 8u32).with("dsn", "mem://".to_string()))
            .unwrap();

        assert_eq!(written, vec!["dsn", "pool"]);
        assert_eq!(registry.owner("pool"), Some("db"));
        assert_eq!(registry.get_as::<u32>("pool").as_deref(), Some(&8));
        assert_eq!(registry.names(), vec!["dsn", "pool"]);
    }

    #[test]
    fn test_same_package_may_overwrite_its_own_key() {
        let mut registry = ServiceRegistry::new();
        registry.merge("db", Exports::new().with("pool", 1u32)).unwrap();
        registry.merge("db", Exports::new().with("pool", 2u32)).unwrap();

        assert_eq!(registry.get_as::<u32>("pool").as_deref(), Some(&2));
    }

    #[test]
    fn test_conflicting_write_rejects_whole_batch() {
        let mut registry = ServiceRegistry::new();
        registry.merge("db", Exports::new().with("pool", 1u32)).unwrap();

        let result = registry.merge(
            "intruder",
            Exports::new().with("fresh", true).with("pool", 9u32),
        );

        match result {
            Err(BootstrapError::RegistryConflict {
                capability,
                owner,
                component,
            }) => {
                assert_eq!(capability, "pool");
                assert_eq!(owner, "db");
                assert_eq!(component, "intruder");
            }
            other => panic!("expected RegistryConflict, got {:?}", other),
        }
        assert!(!registry.contains("fresh"));
        assert_eq!(registry.get_as::<u32>("pool").as_deref(), Some(&1));
    }

    #[test]
    fn test_imports_only_contain_consumed_entries() {
        let mut registry = ServiceRegistry::new();
        registry
            .merge("a", Exports::new().with("x", 1u8).with("y", 2u8))
            .unwrap();

        let imports = registry.imports_for(&["x".to_string(), "absent".to_string()]);
        assert_eq!(imports.names(), vec!["x"]);

        registry.merge("b", Exports::new().with("z", 3u8)).unwrap();
        assert_eq!(imports.len(), 1);
    }
}
