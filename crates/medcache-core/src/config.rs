//! Application configuration management.
//!
//! Configuration is stored at `~/.config/medcache/config.json` and selects
//! where offline records live and which catalog file to serve.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceCatalog;

/// Application name used for config/data directory paths
const APP_NAME: &str = "medcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory holding one file per saved category
const OFFLINE_DIR: &str = "medical_info";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base data directory. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Catalog file to use instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the offline record files.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        let base = match self.data_dir {
            Some(ref dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
                .join(APP_NAME),
        };
        Ok(base.join(OFFLINE_DIR))
    }

    /// The configured catalog, or the bundled one.
    pub fn catalog(&self) -> Result<ReferenceCatalog> {
        match self.catalog_path {
            Some(ref path) => ReferenceCatalog::load(path)
                .with_context(|| format!("Failed to load catalog: {}", path.display())),
            None => ReferenceCatalog::builtin().context("Bundled catalog is invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            catalog_path: None,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_storage_dir_uses_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/medcache-test")),
            catalog_path: None,
        };
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/tmp/medcache-test").join("medical_info")
        );
    }

    #[test]
    fn test_catalog_defaults_to_builtin() {
        let catalog = Config::default().catalog().unwrap();
        assert!(catalog.contains("first-aid"));
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"categories":[{"id":"poison","title":"Poisoning","source":"WHO",
                "lastUpdated":"2024-05-01","content":{"introduction":"Call 15."}}]}"#,
        )
        .unwrap();
        let config = Config {
            data_dir: None,
            catalog_path: Some(path),
        };
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("poison"));
    }
}
