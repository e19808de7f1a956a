use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::kline::{parse_interval, Interval};
use crate::storage::{CandleStore, PostgresCandleStore, SqliteCandleStore};

pub const DATABASE_URL_ENV: &str = "KLINE_DATABASE_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub driver: StorageDriver,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub dsn: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub exchange: String,
    pub interval: String,
    /// Maximum candles an exchange returns per historical request.
    pub request_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FetchConfig {
    pub fn interval(&self) -> Result<Interval> {
        parse_interval(&self.interval)
            .with_context(|| format!("fetch.interval '{}' is invalid", self.interval))
    }
}

impl Config {
    /// Read a TOML config file. `.env` is loaded first and `KLINE_DATABASE_URL`
    /// overrides `storage.dsn`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let Ok(dsn) = std::env::var(DATABASE_URL_ENV) {
            if !dsn.trim().is_empty() {
                config.storage.dsn = Some(dsn);
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid config toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.fetch.interval()?;
        if self.fetch.request_limit == 0 {
            bail!("fetch.request_limit must be > 0");
        }
        if self.fetch.exchange.trim().is_empty() {
            bail!("fetch.exchange must be set");
        }
        match self.storage.driver {
            StorageDriver::Sqlite if self.storage.path.is_none() => {
                bail!("storage.path is required for the sqlite driver")
            }
            StorageDriver::Postgres if self.storage.dsn.is_none() => {
                bail!("storage.dsn (or {DATABASE_URL_ENV}) is required for the postgres driver")
            }
            _ => Ok(()),
        }
    }

    /// Open the configured storage backend and make sure its schema exists.
    pub fn open_store(&self) -> Result<Box<dyn CandleStore>> {
        match self.storage.driver {
            StorageDriver::Sqlite => {
                let path = self
                    .storage
                    .path
                    .as_ref()
                    .context("storage.path is required for the sqlite driver")?;
                Ok(Box::new(SqliteCandleStore::open(path)?))
            }
            StorageDriver::Postgres => {
                let dsn = self
                    .storage
                    .dsn
                    .as_ref()
                    .context("storage.dsn is required for the postgres driver")?;
                let store = PostgresCandleStore::new(dsn.clone());
                store.ensure_schema()?;
                Ok(Box::new(store))
            }
        }
    }
}
