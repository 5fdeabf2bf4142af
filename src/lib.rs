// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod application; // bootstrapped application + entry functions
pub mod config;      // config files, graph, validation
pub mod engine;      // orchestrator, registry, sorter
pub mod errors;      // error handling
pub mod loader;      // manifests and entry points
pub mod observability;
pub mod traits;      // package records, observers, sources

pub use application::{bootstrap, create_application, Application};
pub use config::BootstrapOptions;
pub use engine::{Orchestrator, Registrar, ServiceRegistry};
pub use errors::{BootstrapError, LoaderError};
pub use loader::{ManifestLoader, SetupRegistry};
pub use traits::{ComponentRecord, Exports, Imports, PackageMeta, SetupFailure};
