// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for package set validation.
//!
//! This module contains message types for logging events related to:
//! * Duplicate package names and duplicate provisions
//! * Consumed capabilities without a provider
//! * Cyclic dependency detection

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic dependency detected between packages.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dipper::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["web", "auth", "web"];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// assert_eq!(msg.to_string(), "Cyclic dependency detected: web -> auth -> web");
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cyclic_dependency",
            span_name = name,
            cycle = self.cycle.join(" -> "),
        )
    }
}

/// A consumed capability has no provider.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct MissingProvider<'a> {
    pub capability: &'a str,
    pub consumers: &'a [&'a str],
}

impl Display for MissingProvider<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Capability '{}' is missing a provider: consumed by {}",
            self.capability,
            self.consumers.join(", ")
        )
    }
}

impl StructuredLog for MissingProvider<'_> {
    fn log(&self) {
        tracing::error!(
            capability = self.capability,
            consumers = self.consumers.join(","),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "missing_provider",
            span_name = name,
            capability = self.capability,
        )
    }
}

/// Two packages share a name.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicatePackageName<'a> {
    pub package: &'a str,
}

impl Display for DuplicatePackageName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate package name: '{}'", self.package)
    }
}

impl StructuredLog for DuplicatePackageName<'_> {
    fn log(&self) {
        tracing::error!(package = self.package, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("duplicate_package", span_name = name, package = self.package)
    }
}

/// A capability is declared by more than one package.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateProvision<'a> {
    pub capability: &'a str,
    pub providers: &'a [&'a str],
}

impl Display for DuplicateProvision<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Capability '{}' is provided by more than one package: {}",
            self.capability,
            self.providers.join(", ")
        )
    }
}

impl StructuredLog for DuplicateProvision<'_> {
    fn log(&self) {
        tracing::error!(
            capability = self.capability,
            providers = self.providers.join(","),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "duplicate_provision",
            span_name = name,
            capability = self.capability,
        )
    }
}

/// All validation checks passed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ValidationPassed {
    pub package_count: usize,
    pub edge_count: usize,
}

impl Display for ValidationPassed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package set is valid: {} packages, {} dependency edges",
            self.package_count, self.edge_count
        )
    }
}

impl StructuredLog for ValidationPassed {
    fn log(&self) {
        tracing::debug!(
            package_count = self.package_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            package_count = self.package_count,
            edge_count = self.edge_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_provider_display() {
        let consumers = vec!["web", "cli"];
        let msg = MissingProvider {
            capability: "db",
            consumers: &consumers,
        };

        assert_eq!(
            msg.to_string(),
            "Capability 'db' is missing a provider: consumed by web, cli"
        );
    }

    #[test]
    fn test_duplicate_provision_display() {
        let providers = vec!["a", "b"];
        let msg = DuplicateProvision {
            capability: "log",
            providers: &providers,
        };

        assert_eq!(
            msg.to_string(),
            "Capability 'log' is provided by more than one package: a, b"
        );
    }
}
