// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_SETUP_TIMEOUT_MS;
use crate::errors::LoaderError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration: which packages to wire together and how long
/// each one gets to finish its setup.
///
/// # Fields
/// * `setup_timeout_ms` - Per-package setup timeout (optional, defaults to 150)
/// * `packages` - Ordered package entries; declaration order is the tie-breaker
///   for the execution order
///
/// # Example
/// ```yaml
/// setup_timeout_ms: 200
/// packages:
///   - packages/storage          # path-only: reads packages/storage/package.yaml
///   - name: web
///     provides: [http]
///     consumes: [db]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_setup_timeout_ms")]
    pub setup_timeout_ms: u64,
    #[serde(alias = "services")]
    pub packages: Vec<PackageEntry>,
}

fn default_setup_timeout_ms() -> u64 {
    DEFAULT_SETUP_TIMEOUT_MS
}

/// One entry of the `packages` list.
///
/// A bare string is a package directory whose metadata lives in its
/// `package.yaml`; a table declares the metadata inline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PackageEntry {
    Path(PathBuf),
    Inline(PackageConfig),
}

/// Package metadata as written in a config file or a `package.yaml` manifest.
///
/// # Fields
/// * `name` - Package name (defaults to the last component of `path`)
/// * `path` - Package directory, relative to the config file's directory
/// * `main` - Preferred entry point name
/// * `provides` - Capabilities the package registers
/// * `consumes` - Capabilities the package imports
/// * `options` - Additional package-specific options
///
/// # Example
/// ```yaml
/// name: "calculator"
/// main: "calculator_main"
/// provides: ["calculator"]
/// consumes: ["settings"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PackageConfig {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub main: Option<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

/// Config file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Deserialize `content` in the given format; `origin` is only used in errors.
pub fn parse_document<T>(content: &str, format: ConfigFormat, origin: &Path) -> Result<T, LoaderError>
where
    T: for<'de> Deserialize<'de>,
{
    let parsed = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|reason| LoaderError::Parse {
        path: origin.to_path_buf(),
        reason,
    })
}

/// Read and deserialize a file, picking the format from its extension.
pub fn read_document<T>(path: &Path) -> Result<T, LoaderError>
where
    T: for<'de> Deserialize<'de>,
{
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, format, path)
}

/// Load a config from a YAML, JSON or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LoaderError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoaderError::ConfigNotFound(path.to_path_buf()));
    }
    read_document(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
setup_timeout_ms: 75
packages:
  - name: storage
    provides: [db]
  - name: web
    provides: [http]
    consumes: [db]
"#;

        let cfg: Config = parse_document(yaml, ConfigFormat::Yaml, Path::new("inline.yaml")).unwrap();
        assert_eq!(cfg.setup_timeout_ms, 75);
        assert_eq!(cfg.packages.len(), 2);
        match &cfg.packages[1] {
            PackageEntry::Inline(package) => {
                assert_eq!(package.name.as_deref(), Some("web"));
                assert_eq!(package.consumes, vec!["db"]);
            }
            other => panic!("expected inline package, got {:?}", other),
        }
    }

    #[test]
    fn test_setup_timeout_defaults() {
        let yaml = r#"
packages:
  - name: only
"#;

        let cfg: Config = parse_document(yaml, ConfigFormat::Yaml, Path::new("inline.yaml")).unwrap();
        assert_eq!(cfg.setup_timeout_ms, DEFAULT_SETUP_TIMEOUT_MS);
    }

    #[test]
    fn test_bare_string_entries_are_paths() {
        let yaml = r#"
services:
  - packages/storage
  - name: web
"#;

        let cfg: Config = parse_document(yaml, ConfigFormat::Yaml, Path::new("inline.yaml")).unwrap();
        assert_eq!(
            cfg.packages[0],
            PackageEntry::Path(PathBuf::from("packages/storage"))
        );
        assert!(matches!(cfg.packages[1], PackageEntry::Inline(_)));
    }

    #[test]
    fn test_parse_package_with_options() {
        let yaml = r#"
packages:
  - name: server
    options:
      port: 8080
      verbose: true
"#;

        let cfg: Config = parse_document(yaml, ConfigFormat::Yaml, Path::new("inline.yaml")).unwrap();
        let PackageEntry::Inline(package) = &cfg.packages[0] else {
            panic!("expected inline package");
        };
        assert_eq!(package.options.len(), 2);
        assert_eq!(package.options["port"].as_u64(), Some(8080));
    }

    #[test]
    fn test_json_and_toml_formats() {
        let json = r#"{ "packages": [ { "name": "a", "provides": ["x"] } ] }"#;
        let cfg: Config = parse_document(json, ConfigFormat::Json, Path::new("c.json")).unwrap();
        assert_eq!(cfg.packages.len(), 1);

        let toml_src = r#"
setup_timeout_ms = 20

[[packages]]
name = "a"
provides = ["x"]

[[packages]]
name = "b"
consumes = ["x"]
"#;
        let cfg: Config = parse_document(toml_src, ConfigFormat::Toml, Path::new("c.toml")).unwrap();
        assert_eq!(cfg.setup_timeout_ms, 20);
        assert_eq!(cfg.packages.len(), 2);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("a.ini")),
            Err(LoaderError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let result: Result<Config, _> =
            parse_document("packages: [", ConfigFormat::Yaml, Path::new("broken.yaml"));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("broken.yaml"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.yaml");
        assert!(matches!(result, Err(LoaderError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "packages:\n  - name: a\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.packages.len(), 1);
    }
}
