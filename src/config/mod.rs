use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_data_dir() -> PathBuf {
    PathBuf::from(".project-tracker")
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory the key-value storage keeps its files in
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}
