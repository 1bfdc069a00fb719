use crate::data_source::SampleDataset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DADOS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "dados.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to read sample dataset {path}: {source}")]
    Sample {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_width: f32,
    pub window_height: f32,
    /// Replaces the built-in sample dataset when set.
    pub sample_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 720.0,
            window_height: 560.0,
            sample_path: None,
        }
    }
}

impl AppConfig {
    /// Reads a config file. A missing file yields `Ok(None)`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Loads from `$DADOS_CONFIG` or `./dados.json`, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        match Self::from_file(&path) {
            Ok(Some(config)) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Ok(None) => {
                tracing::debug!("No config at {}; using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn sample_dataset(&self) -> Result<SampleDataset, ConfigError> {
        match &self.sample_path {
            Some(path) => SampleDataset::from_path(path).map_err(|source| ConfigError::Sample {
                path: path.clone(),
                source,
            }),
            None => Ok(SampleDataset::builtin()),
        }
    }
}
