// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The single error type returned by a bootstrap run.
//!
//! Every variant aborts the whole run. Validation variants are produced before
//! any setup routine executes; execution variants abort mid-sequence and the
//! partially built registry is dropped with them.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::errors::LoaderError;

/// A consumed capability that no package provides, with everyone asking for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    pub capability: String,
    /// Consuming packages in declaration order
    pub consumers: Vec<String>,
}

impl fmt::Display for MissingCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' (consumed by {})",
            self.capability,
            self.consumers.join(", ")
        )
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The package list was empty.
    #[error("no packages defined")]
    NoComponents,

    /// Two packages share a name.
    #[error("duplicate package name: '{component}'")]
    DuplicateComponent { component: String },

    /// More than one package declares the same capability in `provides`.
    #[error(
        "capability '{capability}' is provided by more than one package: {}",
        .providers.join(", ")
    )]
    DuplicateProvision {
        capability: String,
        providers: Vec<String>,
    },

    /// One or more consumed capabilities have no provider.
    #[error("{} capabilities are missing a provider: {}", .missing.len(), format_missing(.missing))]
    MissingDependency { missing: Vec<MissingCapability> },

    /// The provides/consumes relation contains at least one cycle.
    #[error("circular dependency detected: {}", format_cycles(.cycles))]
    CircularDependency {
        /// Each cycle is a closed path, e.g. `[a, b, a]`
        cycles: Vec<Vec<String>>,
    },

    /// Raised by the package loader (including unresolvable entry points) and
    /// surfaced unchanged.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A package did not register all declared capabilities in time.
    #[error(
        "package '{component}' did not register services within {timeout:?}: {}",
        .missing.join(", ")
    )]
    SetupTimeout {
        component: String,
        missing: Vec<String>,
        timeout: Duration,
    },

    /// A setup routine returned an error or reported one through its registrar.
    #[error("package '{component}' failed during setup: {reason}")]
    SetupFailed { component: String, reason: String },

    /// A package tried to write a capability owned by another package.
    #[error(
        "package '{component}' tried to register '{capability}', which is already registered by '{owner}'"
    )]
    RegistryConflict {
        capability: String,
        owner: String,
        component: String,
    },

    #[error("invalid bootstrap options: {0}")]
    InvalidOptions(String),

    #[error("internal consistency error: {0}")]
    Internal(String),
}

impl BootstrapError {
    /// Package names this error is about, deduplicated, in first-mention order.
    pub fn components(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();

        match self {
            BootstrapError::DuplicateComponent { component }
            | BootstrapError::SetupTimeout { component, .. }
            | BootstrapError::SetupFailed { component, .. } => names.push(component),
            BootstrapError::DuplicateProvision { providers, .. } => {
                names.extend(providers.iter().map(String::as_str))
            }
            BootstrapError::MissingDependency { missing } => {
                for consumer in missing.iter().flat_map(|m| m.consumers.iter()) {
                    if !names.contains(&consumer.as_str()) {
                        names.push(consumer);
                    }
                }
            }
            BootstrapError::CircularDependency { cycles } => {
                for node in cycles.iter().flatten() {
                    if !names.contains(&node.as_str()) {
                        names.push(node);
                    }
                }
            }
            BootstrapError::RegistryConflict {
                owner, component, ..
            } => {
                names.push(component);
                names.push(owner);
            }
            BootstrapError::Loader(LoaderError::EntryPoint { package, .. }) => names.push(package),
            _ => {}
        }

        names
    }

    /// Capability names this error is about.
    pub fn capabilities(&self) -> Vec<&str> {
        match self {
            BootstrapError::DuplicateProvision { capability, .. }
            | BootstrapError::RegistryConflict { capability, .. } => vec![capability],
            BootstrapError::MissingDependency { missing } => {
                missing.iter().map(|m| m.capability.as_str()).collect()
            }
            BootstrapError::SetupTimeout { missing, .. } => {
                missing.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// True for errors detected before any setup routine ran.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            BootstrapError::NoComponents
                | BootstrapError::DuplicateComponent { .. }
                | BootstrapError::DuplicateProvision { .. }
                | BootstrapError::MissingDependency { .. }
                | BootstrapError::CircularDependency { .. }
        )
    }
}

fn format_missing(missing: &[MissingCapability]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| cycle.join(" -> "))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message_lists_capability_and_consumers() {
        let error = BootstrapError::MissingDependency {
            missing: vec![MissingCapability {
                capability: "z".to_string(),
                consumers: vec!["web".to_string(), "cli".to_string()],
            }],
        };

        let message = error.to_string();
        assert!(message.contains("'z' (consumed by web, cli)"));
        assert_eq!(error.components(), vec!["web", "cli"]);
        assert_eq!(error.capabilities(), vec!["z"]);
        assert!(error.is_validation_error());
    }

    #[test]
    fn test_circular_dependency_components_are_deduplicated() {
        let error = BootstrapError::CircularDependency {
            cycles: vec![vec!["a".into(), "b".into(), "a".into()]],
        };

        assert_eq!(error.to_string(), "circular dependency detected: a -> b -> a");
        assert_eq!(error.components(), vec!["a", "b"]);
    }

    #[test]
    fn test_setup_timeout_message() {
        let error = BootstrapError::SetupTimeout {
            component: "db".to_string(),
            missing: vec!["pool".to_string(), "migrations".to_string()],
            timeout: Duration::from_millis(50),
        };

        assert_eq!(
            error.to_string(),
            "package 'db' did not register services within 50ms: pool, migrations"
        );
        assert!(!error.is_validation_error());
    }
}
