/// Default time a package gets to register its declared capabilities (milliseconds)
pub const DEFAULT_SETUP_TIMEOUT_MS: u64 = 150;
/// Default config file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "./config.yaml";
/// Manifest file read from a path-only package entry
pub const PACKAGE_MANIFEST_FILE: &str = "package.yaml";
/// Entry point tried after the package's `main`
pub const DEFAULT_ENTRY_POINT: &str = "index";
