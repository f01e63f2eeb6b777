//! Process-wide settings, read once at startup.
//!
//! Every value comes from an environment variable (optionally loaded from a
//! `.env` file by the binaries) and falls back to the defaults used for local
//! runs. The resulting `AppConfig` is built in `main.rs` and its parts are
//! handed to the components that need them; nothing reads the environment
//! after startup.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_OUTPUT_DIR: &str = "pdfs";
const DEFAULT_DATABASE_PATH: &str = "box_labels.sqlite";
const DEFAULT_JSON_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Location of the SQLite file backing the record store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory receiving the generated PDFs.
    pub output_dir: PathBuf,
    pub database: DatabaseConfig,
    /// Directory served under `/static`, when set.
    pub static_dir: Option<PathBuf>,
    /// Maximum accepted JSON body, in bytes.
    pub json_limit: usize,
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("LABELS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "LABELS_PORT", DEFAULT_PORT)?;
        let output_dir = lookup("LABELS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let database_path = lookup("LABELS_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let static_dir = lookup("LABELS_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        let json_limit = parse_or(&lookup, "LABELS_JSON_LIMIT", DEFAULT_JSON_LIMIT)?;

        Ok(Self {
            host,
            port,
            output_dir,
            database: DatabaseConfig {
                path: database_path,
            },
            static_dir,
            json_limit,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value: raw,
        }),
    }
}
