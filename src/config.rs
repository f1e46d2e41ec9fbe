use crate::error::{Result, SamGisError};
use samgis_prompt_common::basemap::{ProviderTable, OPEN_STREET_MAP};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENDPOINT_ENV: &str = "SAMGIS_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub default_source: String,
    pub providers: ProviderTable,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SamGisError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("samgis-prompt").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            endpoint: "http://localhost:7860/infer_samgis".into(),
            timeout_seconds: 120,
            default_source: OPEN_STREET_MAP.into(),
            providers: ProviderTable::builtin(),
        }
    }

    pub fn get_endpoint(&self) -> String {
        // environment variable wins
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                return endpoint;
            }
        }

        self.endpoint.clone()
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(SamGisError::InvalidArgument(format!(
                "endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }
        self.endpoint = endpoint;
        Ok(())
    }
}
