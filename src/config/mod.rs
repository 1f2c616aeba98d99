use crate::catalog::CatalogOverrides;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Component, PathBuf};

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Fixed RNG seed for reproducible simulations; fresh entropy when unset.
    pub seed: Option<u64>,
    pub catalog: CatalogOverrides,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = crate::paths::data_dir().unwrap_or_else(|_| PathBuf::from("data"));
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_dir,
            seed: None,
            catalog: CatalogOverrides::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = Self::from_conf_file()? {
            config.apply_file(file_config);
        }

        if let Ok(host) = std::env::var("PIPEWATCH_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("PIPEWATCH_PORT") {
            config.port = port.parse().unwrap_or(DEFAULT_PORT);
        }

        if let Ok(data_dir) = std::env::var("PIPEWATCH_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(seed) = std::env::var("PIPEWATCH_SEED") {
            config.seed = seed.parse().ok();
        }

        config.normalize_data_dir()?;
        Ok(config)
    }

    fn from_conf_file() -> Result<Option<FileConfig>> {
        let path = crate::paths::conf_dir()?.join("config.json");
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(file_config))
    }

    fn apply_file(&mut self, file_config: FileConfig) {
        if let Some(host) = file_config.host {
            self.host = host;
        }
        if let Some(port) = file_config.port {
            self.port = port;
        }
        if let Some(data_dir) = file_config.data_dir {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(seed) = file_config.seed {
            self.seed = Some(seed);
        }
        if let Some(catalog) = file_config.catalog {
            self.catalog = catalog;
        }
    }

    fn normalize_data_dir(&mut self) -> Result<()> {
        if self.data_dir.is_absolute() {
            return Ok(());
        }

        if self
            .data_dir
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            anyhow::bail!("data_dir cannot contain '..'");
        }

        let root = crate::paths::install_root()?;
        self.data_dir = root.join(&self.data_dir);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<String>,
    seed: Option<u64>,
    catalog: Option<CatalogOverrides>,
}
