use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub db_path: PathBuf,
    pub settings_path: PathBuf,
    pub page_size: usize,
}

impl Config {
    /// Environment first (`.env` loaded if present), hard-coded
    /// defaults last.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("LARDER_BASE_URL")
            .unwrap_or_else(|_| larder_client::DEFAULT_BASE_URL.to_string());
        let db_path: PathBuf = std::env::var("LARDER_DB_PATH")
            .unwrap_or_else(|_| "larder.db".into())
            .into();
        let settings_path: PathBuf = std::env::var("LARDER_SETTINGS_PATH")
            .unwrap_or_else(|_| "larder-settings.json".into())
            .into();
        let page_size = std::env::var("LARDER_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .context("LARDER_PAGE_SIZE must be a positive integer")?;

        Ok(Self {
            base_url,
            db_path,
            settings_path,
            page_size,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: larder_client::DEFAULT_BASE_URL.to_string(),
            db_path: "larder.db".into(),
            settings_path: "larder-settings.json".into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
