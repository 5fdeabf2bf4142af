// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for turning config entries into package records.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Package config loaded from disk.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub package_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} package entries from {}",
            self.package_count,
            self.path.display()
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            package_count = self.package_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("config_loaded", span_name = name, path = %self.path.display())
    }
}

/// A package's metadata was read from its manifest file.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ManifestLoaded<'a> {
    pub package: &'a str,
    pub manifest: &'a Path,
}

impl Display for ManifestLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded manifest for package '{}' from {}",
            self.package,
            self.manifest.display()
        )
    }
}

impl StructuredLog for ManifestLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            manifest = %self.manifest.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("manifest_loaded", span_name = name, package = self.package)
    }
}

/// A setup routine was found for a package.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct EntryPointResolved<'a> {
    pub package: &'a str,
    pub entry_point: &'a str,
}

impl Display for EntryPointResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' uses entry point '{}'",
            self.package, self.entry_point
        )
    }
}

impl StructuredLog for EntryPointResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            entry_point = self.entry_point,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "entry_point_resolved",
            span_name = name,
            package = self.package,
            entry_point = self.entry_point,
        )
    }
}
