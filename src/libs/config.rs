//! Connection parameters and the persisted client configuration.
//!
//! [`ConnectionParams`] describes how a session reaches the store and who it
//! authenticates as. [`Config`] wraps the default parameters used by the
//! command-line client and stores them as JSON in the platform data
//! directory:
//!
//! - **Windows**: `%LOCALAPPDATA%\delwink\patts\config.json`
//! - **macOS**: `~/Library/Application Support/delwink/patts/config.json`
//! - **Linux**: `~/.local/share/delwink/patts/config.json`
//!
//! Environment variables override the file (after loading `.env`):
//! `PATTS_DB_TYPE`, `PATTS_DB_HOST`, `PATTS_DB_PORT`, `PATTS_DB_USER`,
//! `PATTS_DB_PASSWORD` and `PATTS_DB_NAME`.

use super::data_storage::DataStorage;
use crate::libs::error::{PattsError, Result as PattsResult};
use crate::libs::messages::Message;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs::{self, File};
use std::path::PathBuf;
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "patts.db";

/// Kind of relational store behind a session. SQLite is the only backend.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = PattsError;

    fn from_str(s: &str) -> PattsResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            _ => Err(PattsError::Connection(Message::UnknownStoreKind(s.to_string()).to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Everything needed to open a session against the store.
///
/// `host` is the host the client connects from; it is matched against the
/// user's registered host pattern. `port` is kept for configuration
/// compatibility and has no effect on SQLite. `database` is the database
/// file; when absent, `patts.db` in the data directory is used.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConnectionParams {
    #[serde(default)]
    pub kind: StoreKind,
    pub host: String,
    #[serde(default)]
    pub port: u16,
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        ConnectionParams {
            kind: StoreKind::Sqlite,
            host: "localhost".to_string(),
            port: 0,
            user: "root".to_string(),
            password: None,
            database: None,
        }
    }
}

impl ConnectionParams {
    /// Parameters for a SQLite database file, connecting from `localhost`.
    pub fn sqlite(database: impl Into<String>, user: impl Into<String>, password: Option<&str>) -> Self {
        ConnectionParams {
            user: user.into(),
            password: password.map(str::to_string),
            database: Some(database.into()),
            ..ConnectionParams::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Resolves the database file path.
    pub fn database_path(&self) -> PattsResult<PathBuf> {
        match &self.database {
            Some(path) => Ok(PathBuf::from(path)),
            None => DataStorage::new()
                .get_path(DB_FILE_NAME)
                .map_err(|e| PattsError::Connection(format!("{}: {}", Message::DataStoragePathError, e))),
        }
    }

    /// Applies `PATTS_DB_*` environment overrides.
    pub fn apply_env(&mut self) -> PattsResult<()> {
        if let Ok(kind) = env::var("PATTS_DB_TYPE") {
            self.kind = kind.parse()?;
        }
        if let Ok(host) = env::var("PATTS_DB_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PATTS_DB_PORT") {
            self.port = port
                .parse()
                .map_err(|_| PattsError::Connection(Message::InvalidPort(port.clone()).to_string()))?;
        }
        if let Ok(user) = env::var("PATTS_DB_USER") {
            self.user = user;
        }
        if let Ok(password) = env::var("PATTS_DB_PASSWORD") {
            self.password = Some(password);
        }
        if let Ok(database) = env::var("PATTS_DB_NAME") {
            self.database = Some(database);
        }
        Ok(())
    }
}

/// Client configuration persisted between runs. The password is never saved.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionParams,
}

impl Config {
    /// Reads the configuration file, falling back to defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads the configuration and applies `.env` and environment overrides.
    pub fn load() -> Result<Config> {
        // A missing .env file is the normal case.
        let _ = dotenv::dotenv();
        let mut config = Self::read()?;
        config.connection.apply_env()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }
}
