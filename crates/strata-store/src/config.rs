use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Environment variable that overrides [`StoreConfig::dir`].
pub const DATA_DIR_ENV: &str = "STRATA_DATA_DIR";

/// Configuration for an on-disk store.
///
/// ```toml
/// dir = "/var/lib/strata"
/// scan_buffer = 512
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database file.
    pub dir: PathBuf,
    /// Number of scanned entries buffered between the reader thread and the
    /// list pipeline.
    pub scan_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            scan_buffer: 256,
        }
    }
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> StoreResult<Self> {
        toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&input)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.dir = PathBuf::from(dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.dir, PathBuf::from("./data"));
        assert_eq!(c.scan_buffer, 256);
    }

    #[test]
    fn parses_toml_with_defaults() {
        let c = StoreConfig::from_toml_str(r#"dir = "/srv/strata""#).unwrap();
        assert_eq!(c.dir, PathBuf::from("/srv/strata"));
        assert_eq!(c.scan_buffer, 256);
    }

    #[test]
    fn rejects_bad_toml() {
        let err = StoreConfig::from_toml_str("scan_buffer = \"many\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, "dir = \"db\"\nscan_buffer = 8\n").unwrap();
        let c = StoreConfig::load(&path).unwrap();
        assert_eq!(c, StoreConfig { dir: "db".into(), scan_buffer: 8 });
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = StoreConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn env_override_replaces_dir() {
        let c = StoreConfig::default()
            .with_overrides(|name| (name == DATA_DIR_ENV).then(|| "/tmp/other".to_string()));
        assert_eq!(c.dir, PathBuf::from("/tmp/other"));

        let unchanged = StoreConfig::new("keep").with_overrides(|_| Some("  ".to_string()));
        assert_eq!(unchanged.dir, PathBuf::from("keep"));
    }
}
