// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while turning a config file into package records.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    /// The package config file does not exist.
    #[error("package config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Reading a config or manifest file failed.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config or manifest file could not be deserialized.
    #[error("failed to parse '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// The file extension does not map to a supported format.
    #[error("unsupported config format: '{}' (expected .yaml, .yml, .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A path-only package entry has no `package.yaml` next to it.
    #[error("package manifest not found for package path: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// No registered setup routine matches any entry point candidate.
    #[error(
        "unable to resolve entry point for package '{package}' (tried: {})",
        .tried.join(", ")
    )]
    EntryPoint { package: String, tried: Vec<String> },

    /// An inline entry gives neither a name nor a path to derive one from.
    #[error("package entry #{index} has no name and no path to derive one from")]
    UnnamedPackage { index: usize },
}
