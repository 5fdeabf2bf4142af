// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod loader;
mod runtime;
mod validation;

pub mod consts;

pub use dependency_graph::{DependencyGraph, ProviderIndex};
pub use loader::{
    load_config, parse_document, read_document, Config, ConfigFormat, PackageConfig, PackageEntry,
};
pub use runtime::BootstrapOptions;
pub use validation::{detect_cycles, detect_missing_dependencies, validate_dependency_graph};
