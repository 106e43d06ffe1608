//! Runtime configuration loaded from `.env` and environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORDCLOUD_URL: &str = "https://quickchart.io/wordcloud";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub file_storing_url: String,
    pub data_dir: PathBuf,
    pub wordcloud_url: String,
    pub http_timeout: Duration,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => 3000,
        };

        let timeout_secs: u64 = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be whole seconds, got {:?}", raw))?,
            None => 30,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            file_storing_url: lookup("FILE_STORING_URL")
                .unwrap_or_else(|| "http://localhost:5001".into()),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/app/data")),
            wordcloud_url: lookup("WORDCLOUD_URL").unwrap_or_else(|| DEFAULT_WORDCLOUD_URL.into()),
            http_timeout: Duration::from_secs(timeout_secs),
            log_level: lookup("LOG_LEVEL")
                .unwrap_or_else(|| "analysis_service=info,tower_http=info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()).map(PathBuf::from),
        })
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("reports.json")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
