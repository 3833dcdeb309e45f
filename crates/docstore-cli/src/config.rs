use std::path::{Path, PathBuf};

use docstore_core::{EnvelopeFormat, StoreConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocstoreConfig {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub root: Option<String>,
    #[serde(default)]
    pub format: EnvelopeFormat,
    pub work_factor: Option<u8>,
}

impl DocstoreConfig {
    pub fn new(root: Option<PathBuf>, format: EnvelopeFormat, work_factor: Option<u8>) -> Self {
        Self {
            store: StoreSection {
                root: root.map(|path| path.to_string_lossy().to_string()),
                format,
                work_factor,
            },
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            format: self.store.format,
            work_factor: self.store.work_factor,
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Load the config at `path`, or defaults when `path` is the implicit
/// default location and nothing is there.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DocstoreConfig> {
    match path {
        Some(path) => read_config(path),
        None => {
            let path = default_config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                Ok(DocstoreConfig::default())
            }
        }
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<DocstoreConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &DocstoreConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("docstore"));
        }
    }
    Ok(home_dir()?.join(".config").join("docstore"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
