// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the bootstrap lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Bootstrap start, completion and failure
//! * Resolved execution order
//! * Per-package setup (start, completion, timeout)
//! * Capability registrations that are ignored or undeclared

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Bootstrap started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dipper::observability::messages::bootstrap::BootstrapStarted;
/// use std::time::Duration;
///
/// let msg = BootstrapStarted {
///     package_count: 3,
///     setup_timeout: Duration::from_millis(150),
/// };
///
/// assert_eq!(msg.to_string(), "Bootstrapping 3 packages (setup timeout 150ms)");
/// ```
pub struct BootstrapStarted {
    pub package_count: usize,
    pub setup_timeout: Duration,
}

impl Display for BootstrapStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bootstrapping {} packages (setup timeout {:?})",
            self.package_count, self.setup_timeout
        )
    }
}

impl StructuredLog for BootstrapStarted {
    fn log(&self) {
        tracing::info!(
            package_count = self.package_count,
            setup_timeout_ms = self.setup_timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bootstrap",
            span_name = name,
            package_count = self.package_count,
            setup_timeout_ms = self.setup_timeout.as_millis() as u64,
        )
    }
}

/// Bootstrap completed and the registry was handed to the caller.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BootstrapCompleted {
    pub package_count: usize,
    pub service_count: usize,
    pub duration: Duration,
}

impl Display for BootstrapCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bootstrap completed: {} packages set up, {} services registered in {:?}",
            self.package_count, self.service_count, self.duration
        )
    }
}

impl StructuredLog for BootstrapCompleted {
    fn log(&self) {
        tracing::info!(
            package_count = self.package_count,
            service_count = self.service_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bootstrap_completed",
            span_name = name,
            package_count = self.package_count,
            duration = ?self.duration,
        )
    }
}

/// Bootstrap failed; the partial registry has been discarded.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct BootstrapFailed<'a> {
    pub package: Option<&'a str>,
    pub error: &'a dyn std::error::Error,
}

impl Display for BootstrapFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.package {
            Some(package) => write!(f, "Bootstrap failed at package '{}': {}", package, self.error),
            None => write!(f, "Bootstrap failed: {}", self.error),
        }
    }
}

impl StructuredLog for BootstrapFailed<'_> {
    fn log(&self) {
        tracing::error!(
            package = self.package.unwrap_or("-"),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "bootstrap_failed",
            span_name = name,
            package = self.package.unwrap_or("-"),
            error = %self.error,
        )
    }
}

/// Execution order resolved by the topological sort.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ExecutionOrderResolved<'a> {
    pub order: &'a [&'a str],
}

impl Display for ExecutionOrderResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Execution order: {}", self.order.join(" -> "))
    }
}

impl StructuredLog for ExecutionOrderResolved<'_> {
    fn log(&self) {
        tracing::debug!(order = self.order.join(","), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("execution_order", span_name = name, order = self.order.join(","))
    }
}

/// A package's setup routine is about to be called.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct PackageSetupStarted<'a> {
    pub package: &'a str,
    pub position: usize,
    pub import_count: usize,
}

impl Display for PackageSetupStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Setting up package '{}' (#{}) with {} imports",
            self.package, self.position, self.import_count
        )
    }
}

impl StructuredLog for PackageSetupStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            position = self.position,
            import_count = self.import_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "package_setup",
            span_name = name,
            package = self.package,
            position = self.position,
        )
    }
}

/// A package registered every capability it declared.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PackageSetupCompleted<'a> {
    pub package: &'a str,
    pub provided: &'a [String],
    pub duration: Duration,
}

impl Display for PackageSetupCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.provided.is_empty() {
            write!(f, "Package '{}' set up in {:?}", self.package, self.duration)
        } else {
            write!(
                f,
                "Package '{}' set up in {:?}, provides: {}",
                self.package,
                self.duration,
                self.provided.join(", ")
            )
        }
    }
}

impl StructuredLog for PackageSetupCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            package = self.package,
            provided = self.provided.join(","),
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "package_setup_completed",
            span_name = name,
            package = self.package,
            duration = ?self.duration,
        )
    }
}

/// A package did not register everything before its timeout.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct PackageSetupTimedOut<'a> {
    pub package: &'a str,
    pub missing: &'a [String],
    pub timeout: Duration,
}

impl Display for PackageSetupTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' timed out after {:?} waiting for: {}",
            self.package,
            self.timeout,
            self.missing.join(", ")
        )
    }
}

impl StructuredLog for PackageSetupTimedOut<'_> {
    fn log(&self) {
        tracing::error!(
            package = self.package,
            missing = self.missing.join(","),
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "package_setup_timeout",
            span_name = name,
            package = self.package,
        )
    }
}

/// A registration arrived after its package stopped being the active one.
///
/// # Log Level
/// `warn!` - Unexpected but handled
pub struct RegistrationIgnored<'a> {
    pub package: &'a str,
}

impl Display for RegistrationIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ignoring registration from package '{}': its setup has already finished or failed",
            self.package
        )
    }
}

impl StructuredLog for RegistrationIgnored<'_> {
    fn log(&self) {
        tracing::warn!(package = self.package, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("registration_ignored", span_name = name, package = self.package)
    }
}

/// A package registered a capability it never declared in `provides`.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct UndeclaredCapability<'a> {
    pub package: &'a str,
    pub capability: &'a str,
}

impl Display for UndeclaredCapability<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' registered undeclared capability '{}'",
            self.package, self.capability
        )
    }
}

impl StructuredLog for UndeclaredCapability<'_> {
    fn log(&self) {
        tracing::debug!(package = self.package, capability = self.capability, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "undeclared_capability",
            span_name = name,
            package = self.package,
            capability = self.capability,
        )
    }
}
