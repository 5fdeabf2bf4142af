// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Package records and the setup routine contract.
//!
//! A package is described by a [`PackageMeta`] (its name plus the capabilities
//! it provides and consumes) and a [`Setup`] routine. Capability values are
//! type-erased [`Service`]s so packages written independently can share any
//! `Send + Sync` Rust value without a common schema.
//!
//! # Example
//!
//! ```
//! use the_dipper::traits::{ComponentRecord, Exports, PackageMeta};
//!
//! let record = ComponentRecord::from_fn(
//!     PackageMeta::new("greeter").with_provides(["greeting"]),
//!     |_meta, _imports, _registrar| Ok(Some(Exports::new().with("greeting", "hello".to_string()))),
//! );
//!
//! assert_eq!(record.name(), "greeter");
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::engine::Registrar;

/// An opaque capability value.
pub type Service = Arc<dyn Any + Send + Sync>;

/// What a setup routine hands back synchronously: optional immediate exports.
pub type SetupResult = Result<Option<Exports>, SetupFailure>;

/// Typed view of a service, `None` when the value is of a different type.
pub(crate) fn downcast_service<T: Any + Send + Sync>(service: &Service) -> Option<Arc<T>> {
    service.clone().downcast::<T>().ok()
}

/// Declared metadata for one package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageMeta {
    /// Unique package name
    pub name: String,
    /// Directory the package was loaded from, if any
    pub path: Option<PathBuf>,
    /// Preferred entry point name
    pub main: Option<String>,
    /// Capabilities this package must register during setup
    pub provides: Vec<String>,
    /// Capabilities this package receives as imports
    pub consumes: Vec<String>,
    /// Free-form package options from the config file
    pub options: HashMap<String, serde_yaml::Value>,
}

impl PackageMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_provides<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_consumes<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Look up a package option.
    pub fn option(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.options.get(key)
    }
}

/// A batch of capability values to merge into the registry.
#[derive(Clone, Default)]
pub struct Exports(pub HashMap<String, Service>);

impl Exports {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder form of [`Exports::insert`].
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Wrap `value` as a service under `name`.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.0.insert(name.into(), Arc::new(value));
    }

    /// Insert an already type-erased service.
    pub fn insert_service(&mut self, name: impl Into<String>, service: Service) {
        self.0.insert(name.into(), service);
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Exports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        f.debug_struct("Exports").field("keys", &keys).finish()
    }
}

impl FromIterator<(String, Service)> for Exports {
    fn from_iter<I: IntoIterator<Item = (String, Service)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Exports {
    type Item = (String, Service);
    type IntoIter = std::collections::hash_map::IntoIter<String, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Immutable snapshot of the registry restricted to a package's `consumes`.
///
/// Later registrations never show up in a snapshot that was already handed out.
#[derive(Clone, Default)]
pub struct Imports(HashMap<String, Service>);

impl Imports {
    pub(crate) fn new(services: HashMap<String, Service>) -> Self {
        Self(services)
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.0.get(name)
    }

    /// Typed access; `None` if missing or of another type.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.0.get(name).and_then(downcast_service::<T>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Capability names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Imports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Imports").field("keys", &self.names()).finish()
    }
}

/// Failure reported by a setup routine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SetupFailure(pub String);

impl SetupFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<&str> for SetupFailure {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

impl From<String> for SetupFailure {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}

/// A package's setup routine.
///
/// Called exactly once with the package metadata, a snapshot of its imports,
/// and a [`Registrar`]. Capabilities can be returned directly as
/// `Ok(Some(exports))`, registered through the registrar (possibly later,
/// from a spawned task), or both. The package completes once every declared
/// capability has been registered.
pub trait Setup: Send + Sync {
    fn setup(&self, meta: &PackageMeta, imports: Imports, registrar: Registrar) -> SetupResult;
}

/// Adapter turning a closure into a [`Setup`].
pub struct SetupFn<F>(F);

impl<F> Setup for SetupFn<F>
where
    F: Fn(&PackageMeta, Imports, Registrar) -> SetupResult + Send + Sync,
{
    fn setup(&self, meta: &PackageMeta, imports: Imports, registrar: Registrar) -> SetupResult {
        (self.0)(meta, imports, registrar)
    }
}

/// Box a closure as a shareable setup routine.
pub fn setup_fn<F>(f: F) -> Arc<dyn Setup>
where
    F: Fn(&PackageMeta, Imports, Registrar) -> SetupResult + Send + Sync + 'static,
{
    Arc::new(SetupFn(f))
}

/// A fully resolved package: metadata plus its setup routine.
#[derive(Clone)]
pub struct ComponentRecord {
    pub meta: PackageMeta,
    pub setup: Arc<dyn Setup>,
}

impl ComponentRecord {
    pub fn new(meta: PackageMeta, setup: Arc<dyn Setup>) -> Self {
        Self { meta, setup }
    }

    pub fn from_fn<F>(meta: PackageMeta, f: F) -> Self
    where
        F: Fn(&PackageMeta, Imports, Registrar) -> SetupResult + Send + Sync + 'static,
    {
        Self::new(meta, setup_fn(f))
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

impl fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
