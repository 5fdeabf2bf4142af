// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;

use crate::config::BootstrapOptions;
use crate::engine::{Orchestrator, ServiceRegistry};
use crate::errors::BootstrapError;
use crate::loader::{ManifestLoader, SetupRegistry};
use crate::traits::{ComponentSource, Imports, PackageMeta};

/// A fully bootstrapped set of packages.
#[derive(Debug)]
pub struct Application {
    packages: Vec<PackageMeta>,
    services: ServiceRegistry,
    imports: HashMap<String, Imports>,
}

impl Application {
    pub(crate) fn new(
        packages: Vec<PackageMeta>,
        services: ServiceRegistry,
        imports: HashMap<String, Imports>,
    ) -> Self {
        Self {
            packages,
            services,
            imports,
        }
    }

    /// Package metadata in the order the packages were set up.
    pub fn packages(&self) -> &[PackageMeta] {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&PackageMeta> {
        self.packages.iter().find(|meta| meta.name == name)
    }

    /// Package names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.packages.iter().map(|meta| meta.name.as_str()).collect()
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// The imports a package's setup routine was called with.
    pub fn package_imports(&self, name: &str) -> Option<&Imports> {
        self.imports.get(name)
    }

    pub fn into_services(self) -> ServiceRegistry {
        self.services
    }
}

/// Load packages from `source` and bootstrap them.
pub async fn bootstrap<S>(source: &S, options: BootstrapOptions) -> Result<Application, BootstrapError>
where
    S: ComponentSource + ?Sized,
{
    let records = source.load().await?;
    Orchestrator::new(options).bootstrap(records).await
}

/// Bootstrap the packages listed in a config file.
///
/// Package paths resolve against the config file's directory and the setup
/// timeout comes from the file's `setup_timeout_ms`.
pub async fn create_application<P: AsRef<Path>>(
    config_file: P,
    entry_points: SetupRegistry,
) -> Result<Application, BootstrapError> {
    let loader = ManifestLoader::from_file(config_file, entry_points)?;
    let options = BootstrapOptions::from_config(loader.config())?;
    bootstrap(&loader, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ComponentRecord, Exports};

    #[tokio::test]
    async fn test_bootstrap_from_record_list() {
        let records = vec![
            ComponentRecord::from_fn(
                PackageMeta::new("greeter").with_consumes(["name"]),
                |_meta, imports, _registrar| {
                    let name = imports.get_as::<String>("name").ok_or("no name")?;
                    Ok(Some(Exports::new().with("greeting", format!("hello {}", name))))
                },
            ),
            ComponentRecord::from_fn(
                PackageMeta::new("naming").with_provides(["name"]),
                |_meta, _imports, _registrar| Ok(Some(Exports::new().with("name", "dipper".to_string()))),
            ),
        ];

        let app = bootstrap(&records, BootstrapOptions::default()).await.unwrap();

        assert_eq!(app.order(), vec!["naming", "greeter"]);
        assert_eq!(app.package("greeter").map(|m| m.consumes.len()), Some(1));
        assert_eq!(app.package_imports("greeter").unwrap().names(), vec!["name"]);

        let services = app.into_services();
        let greeting = services.get_as::<String>("greeting");
        assert_eq!(greeting.as_deref().map(String::as_str), Some("hello dipper"));
    }

    #[tokio::test]
    async fn test_create_application_reports_missing_config() {
        let result = create_application("no/such/config.yaml", SetupRegistry::new()).await;
        assert!(matches!(
            result,
            Err(BootstrapError::Loader(crate::errors::LoaderError::ConfigNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_application_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{ "setup_timeout_ms": 0, "packages": [] }"#).unwrap();

        let result = create_application(&path, SetupRegistry::new()).await;
        assert!(matches!(result, Err(BootstrapError::InvalidOptions(_))));
    }
}
