// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::application::Application;
use crate::config::{validate_dependency_graph, BootstrapOptions, DependencyGraph};
use crate::engine::pending::PendingSetup;
use crate::engine::registrar::{Registrar, Registration};
use crate::engine::registry::ServiceRegistry;
use crate::engine::sorter::{order_records, sort_components};
use crate::errors::BootstrapError;
use crate::observability::messages::bootstrap::{
    BootstrapCompleted, BootstrapStarted, ExecutionOrderResolved, PackageSetupStarted,
    PackageSetupTimedOut, UndeclaredCapability,
};
use crate::observability::messages::StructuredLog;
use crate::observability::TracingObserver;
use crate::traits::{BootstrapPhase, ComponentRecord, Imports, LifecycleObserver, PackageMeta};

/// Runs package setup routines one at a time in dependency order.
///
/// ## Execution Model
///
/// 1. **Validate**: build the [`DependencyGraph`] and run every pre-flight
///    check; nothing executes if any of them fails
/// 2. **Sort**: stable topological order, ties broken by declaration order
/// 3. **Run**: for each package in order, hand its setup routine an
///    [`Imports`] snapshot and a [`Registrar`], then wait until the package
///    has registered every capability in its `provides` or the setup timeout
///    elapses
///
/// A package only starts once the previous one is complete, so every import
/// it asks for is already in the registry when its setup routine is called.
///
/// ## Failure Handling
///
/// The first error aborts the run. The registry built so far is dropped with
/// the orchestrator's stack frame; callers either get a whole [`Application`]
/// or a single [`BootstrapError`].
pub struct Orchestrator {
    options: BootstrapOptions,
    observer: Arc<dyn LifecycleObserver>,
}

impl Orchestrator {
    /// Orchestrator reporting through [`TracingObserver`].
    pub fn new(options: BootstrapOptions) -> Self {
        Self {
            options,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// Validate `records` and return the package names in execution order.
    pub fn resolve(&self, records: &[ComponentRecord]) -> Result<Vec<String>, BootstrapError> {
        let graph = DependencyGraph::build(records);
        validate_dependency_graph(records, &graph)?;
        sort_components(&graph)
    }

    /// Validate, order and set up every package.
    pub async fn bootstrap(
        &self,
        records: Vec<ComponentRecord>,
    ) -> Result<Application, BootstrapError> {
        let started = Instant::now();
        BootstrapStarted {
            package_count: records.len(),
            setup_timeout: self.options.setup_timeout,
        }
        .log();

        self.observer.on_phase(BootstrapPhase::Validating);
        let order = match self.resolve(&records) {
            Ok(order) => order,
            Err(e) => return Err(self.abort(None, e)),
        };

        let order_refs: Vec<&str> = order.iter().map(String::as_str).collect();
        ExecutionOrderResolved { order: &order_refs }.log();

        let records = order_records(records, &order);
        let mut registry = ServiceRegistry::new();
        let mut imports: HashMap<String, Imports> = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            self.observer.on_phase(BootstrapPhase::Running(position));
            self.observer.on_started(&record.meta);

            let setup_started = Instant::now();
            match self.setup_component(position, record, &mut registry).await {
                Ok(snapshot) => {
                    imports.insert(record.meta.name.clone(), snapshot);
                    self.observer
                        .on_completed(&record.meta, setup_started.elapsed());
                }
                Err(e) => return Err(self.abort(Some(record.name()), e)),
            }
        }

        self.observer.on_phase(BootstrapPhase::Done);
        BootstrapCompleted {
            package_count: records.len(),
            service_count: registry.len(),
            duration: started.elapsed(),
        }
        .log();

        let packages = records.into_iter().map(|record| record.meta).collect();
        Ok(Application::new(packages, registry, imports))
    }

    /// Run one package's setup routine to completion.
    ///
    /// Returns the imports snapshot the routine was given.
    async fn setup_component(
        &self,
        position: usize,
        record: &ComponentRecord,
        registry: &mut ServiceRegistry,
    ) -> Result<Imports, BootstrapError> {
        let meta = &record.meta;
        let imports = registry.imports_for(&meta.consumes);

        PackageSetupStarted {
            package: &meta.name,
            position,
            import_count: imports.len(),
        }
        .log();

        let mut pending = PendingSetup::new(meta);
        pending.start();

        let (registrar, mut receiver) = Registrar::channel(&meta.name);
        let returned = record
            .setup
            .setup(meta, imports.clone(), registrar)
            .map_err(|failure| BootstrapError::SetupFailed {
                component: meta.name.clone(),
                reason: failure.0,
            })?;

        // Registrations made during the call land before the returned batch.
        while let Ok(registration) = receiver.try_recv() {
            apply(meta, registration, &mut pending, registry)?;
        }
        if let Some(exports) = returned {
            apply(meta, Registration::Exports(exports), &mut pending, registry)?;
        }

        if pending.is_complete() {
            return Ok(imports);
        }

        let timeout = self.options.setup_timeout;
        let waited = tokio::time::timeout(
            timeout,
            await_registrations(meta, &mut receiver, &mut pending, registry),
        )
        .await;

        match waited {
            Ok(result) => result.map(|()| imports),
            Err(_) => {
                pending.time_out();
                drop(receiver);

                PackageSetupTimedOut {
                    package: &meta.name,
                    missing: pending.missing(),
                    timeout,
                }
                .log();

                Err(BootstrapError::SetupTimeout {
                    component: meta.name.clone(),
                    missing: pending.missing().to_vec(),
                    timeout,
                })
            }
        }
    }

    fn abort(&self, package: Option<&str>, error: BootstrapError) -> BootstrapError {
        self.observer.on_phase(BootstrapPhase::Failed);
        self.observer.on_failed(package, &error);
        error
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(BootstrapOptions::default())
    }
}

/// Drain the package's channel until it has registered everything it declared.
///
/// Once every registrar clone is gone nothing can complete the package any
/// more, but the caller's timeout still decides the outcome.
async fn await_registrations(
    meta: &PackageMeta,
    receiver: &mut mpsc::UnboundedReceiver<Registration>,
    pending: &mut PendingSetup,
    registry: &mut ServiceRegistry,
) -> Result<(), BootstrapError> {
    while !pending.is_complete() {
        match receiver.recv().await {
            Some(registration) => apply(meta, registration, pending, registry)?,
            None => std::future::pending::<()>().await,
        }
    }
    Ok(())
}

fn apply(
    meta: &PackageMeta,
    registration: Registration,
    pending: &mut PendingSetup,
    registry: &mut ServiceRegistry,
) -> Result<(), BootstrapError> {
    match registration {
        Registration::Exports(exports) => {
            let written = registry.merge(&meta.name, exports)?;
            for capability in written.iter().filter(|c| !meta.provides.contains(*c)) {
                UndeclaredCapability {
                    package: &meta.name,
                    capability,
                }
                .log();
            }
            pending.record(&written);
            Ok(())
        }
        Registration::Failed(failure) => Err(BootstrapError::SetupFailed {
            component: meta.name.clone(),
            reason: failure.0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Exports;

    fn record(name: &str, provides: &[&str], consumes: &[&str]) -> ComponentRecord {
        let provided: Vec<String> = provides.iter().map(|p| p.to_string()).collect();
        ComponentRecord::from_fn(
            PackageMeta::new(name)
                .with_provides(provides.iter().copied())
                .with_consumes(consumes.iter().copied()),
            move |meta, _imports, _registrar| {
                let mut exports = Exports::new();
                for capability in &provided {
                    exports.insert(capability.clone(), meta.name.clone());
                }
                Ok(Some(exports))
            },
        )
    }

    #[test]
    fn test_resolve_orders_providers_first() {
        let orchestrator = Orchestrator::default();
        let records = vec![
            record("api", &["api"], &["db", "cache"]),
            record("cache", &["cache"], &[]),
            record("db", &["db"], &[]),
        ];

        assert_eq!(
            orchestrator.resolve(&records).unwrap(),
            vec!["cache", "db", "api"]
        );
    }

    #[test]
    fn test_resolve_rejects_empty_input() {
        let orchestrator = Orchestrator::default();
        assert!(matches!(
            orchestrator.resolve(&[]),
            Err(BootstrapError::NoComponents)
        ));
    }

    #[tokio::test]
    async fn test_returned_exports_complete_the_package() {
        let orchestrator = Orchestrator::default();
        let app = orchestrator
            .bootstrap(vec![record("db", &["pool"], &[])])
            .await
            .unwrap();

        let pool = app.services().get_as::<String>("pool");
        assert_eq!(pool.as_deref().map(String::as_str), Some("db"));
        assert_eq!(app.services().owner("pool"), Some("db"));
    }

    #[tokio::test]
    async fn test_sync_registrations_merge_before_returned_batch() {
        let setup = ComponentRecord::from_fn(
            PackageMeta::new("cfg").with_provides(["value"]),
            |_meta, _imports, registrar| {
                registrar.register_one("value", 1u32);
                Ok(Some(Exports::new().with("value", 2u32)))
            },
        );

        let app = Orchestrator::default().bootstrap(vec![setup]).await.unwrap();
        assert_eq!(app.services().get_as::<u32>("value").as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn test_setup_error_is_reported_as_setup_failed() {
        let failing = ComponentRecord::from_fn(
            PackageMeta::new("broken").with_provides(["x"]),
            |_meta, _imports, _registrar| Err("cannot open socket".into()),
        );

        match Orchestrator::default().bootstrap(vec![failing]).await {
            Err(BootstrapError::SetupFailed { component, reason }) => {
                assert_eq!(component, "broken");
                assert_eq!(reason, "cannot open socket");
            }
            other => panic!("expected SetupFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_undeclared_registration_is_accepted() {
        let extra = ComponentRecord::from_fn(PackageMeta::new("extra"), |_meta, _imports, _r| {
            Ok(Some(Exports::new().with("bonus", true)))
        });

        let app = Orchestrator::default().bootstrap(vec![extra]).await.unwrap();
        assert!(app.services().contains("bonus"));
    }
}
