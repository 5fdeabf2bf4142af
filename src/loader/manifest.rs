// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::consts::PACKAGE_MANIFEST_FILE;
use crate::config::{load_config, parse_document, Config, ConfigFormat, PackageConfig, PackageEntry};
use crate::errors::LoaderError;
use crate::loader::SetupRegistry;
use crate::observability::messages::loader::{ConfigLoaded, ManifestLoaded};
use crate::observability::messages::StructuredLog;
use crate::traits::{ComponentRecord, ComponentSource, PackageMeta};

/// Builds package records from a [`Config`] and a table of setup routines.
///
/// ## Entry Resolution
///
/// - **Path entry** (`- packages/db`): metadata comes from
///   `<base_path>/packages/db/package.yaml`
/// - **Inline entry with `path`**: the manifest is read as above and any
///   field given inline overrides it
/// - **Inline entry without `path`**: the inline table is the whole manifest
///
/// A package without a `name` is named after the last component of its path.
/// Its setup routine is then resolved through [`SetupRegistry::resolve`].
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    config: Config,
    base_path: PathBuf,
    entry_points: SetupRegistry,
}

impl ManifestLoader {
    pub fn new(config: Config, base_path: impl Into<PathBuf>, entry_points: SetupRegistry) -> Self {
        Self {
            config,
            base_path: base_path.into(),
            entry_points,
        }
    }

    /// Load the config file at `path`; package paths resolve against its directory.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        entry_points: SetupRegistry,
    ) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let config = load_config(path)?;

        ConfigLoaded {
            path,
            package_count: config.packages.len(),
        }
        .log();

        let base_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self::new(config, base_path, entry_points))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Package metadata for every entry, in declaration order.
    pub async fn load_metas(&self) -> Result<Vec<PackageMeta>, LoaderError> {
        let mut metas = Vec::with_capacity(self.config.packages.len());
        for (index, entry) in self.config.packages.iter().enumerate() {
            metas.push(self.load_meta(index, entry).await?);
        }
        Ok(metas)
    }

    async fn load_meta(&self, index: usize, entry: &PackageEntry) -> Result<PackageMeta, LoaderError> {
        let (declared, inline) = match entry {
            PackageEntry::Path(path) => (Some(path.as_path()), None),
            PackageEntry::Inline(package) => (package.path.as_deref(), Some(package)),
        };

        let Some(relative) = declared else {
            let package = inline.cloned().unwrap_or_default();
            let name = package
                .name
                .clone()
                .ok_or(LoaderError::UnnamedPackage { index })?;
            return Ok(into_meta(name, None, package));
        };

        let package_path = self.base_path.join(relative);
        let mut manifest = read_manifest(&package_path).await?;
        if let Some(overrides) = inline {
            apply_overrides(&mut manifest, overrides);
        }

        let name = match manifest.name.clone() {
            Some(name) => name,
            None => relative
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or(LoaderError::UnnamedPackage { index })?,
        };

        ManifestLoaded {
            package: &name,
            manifest: &package_path.join(PACKAGE_MANIFEST_FILE),
        }
        .log();

        Ok(into_meta(name, Some(package_path), manifest))
    }
}

#[async_trait]
impl ComponentSource for ManifestLoader {
    async fn load(&self) -> Result<Vec<ComponentRecord>, LoaderError> {
        let metas = self.load_metas().await?;

        metas
            .into_iter()
            .map(|meta| {
                let setup = self.entry_points.resolve(&meta)?;
                Ok(ComponentRecord::new(meta, setup))
            })
            .collect()
    }
}

async fn read_manifest(package_path: &Path) -> Result<PackageConfig, LoaderError> {
    let manifest_path = package_path.join(PACKAGE_MANIFEST_FILE);

    let content = match tokio::fs::read_to_string(&manifest_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoaderError::ManifestNotFound(package_path.to_path_buf()));
        }
        Err(source) => {
            return Err(LoaderError::Io {
                path: manifest_path,
                source,
            });
        }
    };

    parse_document(&content, ConfigFormat::Yaml, &manifest_path)
}

fn apply_overrides(manifest: &mut PackageConfig, inline: &PackageConfig) {
    if inline.name.is_some() {
        manifest.name = inline.name.clone();
    }
    if inline.main.is_some() {
        manifest.main = inline.main.clone();
    }
    if !inline.provides.is_empty() {
        manifest.provides = inline.provides.clone();
    }
    if !inline.consumes.is_empty() {
        manifest.consumes = inline.consumes.clone();
    }
    for (key, value) in &inline.options {
        manifest.options.insert(key.clone(), value.clone());
    }
}

fn into_meta(name: String, path: Option<PathBuf>, package: PackageConfig) -> PackageMeta {
    PackageMeta {
        name,
        path,
        main: package.main,
        provides: package.provides,
        consumes: package.consumes,
        options: package.options,
    }
}
