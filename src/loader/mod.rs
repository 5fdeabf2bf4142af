// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turning config files into package records.
//!
//! The engine only sees [`ComponentRecord`](crate::traits::ComponentRecord)s.
//! This module reads a package config plus per-package `package.yaml`
//! manifests and pairs each package with a setup routine from a
//! [`SetupRegistry`].

mod entry_points;
mod manifest;

pub use entry_points::SetupRegistry;
pub use manifest::ManifestLoader;
