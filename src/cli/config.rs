use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, FileSessionStore, DEFAULT_API_URL};

/// Persisted CLI preferences (`env.json` in the config directory).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub api_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("JAVELIN_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("javelin").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    let env_file = get_config_dir()?.join("env.json");

    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: EnvironmentConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    let env_file = get_config_dir()?.join("env.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}

/// `--url` flag, then `JAVELIN_API_URL`, then the saved value, then the default.
pub fn resolve_api_url(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(url) = flag.filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }
    if let Ok(url) = std::env::var("JAVELIN_API_URL") {
        if !url.trim().is_empty() {
            return Ok(url.trim().to_string());
        }
    }
    Ok(load_environment_config()?
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string()))
}

/// An API client whose session lives in the config directory.
pub fn build_client(url_flag: Option<&str>) -> anyhow::Result<ApiClient> {
    let url = resolve_api_url(url_flag)?;
    let store = FileSessionStore::new(get_config_dir()?);
    Ok(ApiClient::new(url, Arc::new(store))?)
}
