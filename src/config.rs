//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export LISTEN="127.0.0.1:8080"
//! export STORAGE_BACKEND="file"
//! export LINKS_FILE="/var/lib/linkstash/links.json"
//! export PUBLIC_BASE_URL="https://s.example.com"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `127.0.0.1:8080`)
//! - `STORAGE_BACKEND` - `file` or `memory` (default: `file`)
//! - `LINKS_FILE` - State file for the file backend (default: `links.json`)
//! - `PUBLIC_BASE_URL` - Base of the short links written to the state file
//!   and used when a request carries no `Host` header (default: `http://localhost:8080`)
//! - `STORE_WRITE_TIMEOUT_MS` - Durable write timeout (default: 5000)
//! - `GENERATOR_MAX_ATTEMPTS` - Short id retry cap (default: 100)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::RegistryOptions;

/// Where the registry keeps its entries between restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("STORAGE_BACKEND must be 'file' or 'memory', got '{other}'"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub storage_backend: StorageBackend,
    pub links_file: PathBuf,
    /// Without trailing slash.
    pub public_base_url: String,
    pub store_write_timeout_ms: u64,
    pub generator_max_attempts: usize,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "file".to_string())
            .parse()?;

        let links_file = env::var("LINKS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("links.json"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let store_write_timeout_ms = parse_var("STORE_WRITE_TIMEOUT_MS", 5_000)?;
        let generator_max_attempts = parse_var("GENERATOR_MAX_ATTEMPTS", 100)?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            listen_addr,
            storage_backend,
            links_file,
            public_base_url,
            store_write_timeout_ms,
            generator_max_attempts,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `public_base_url` is not an absolute http(s) URL
    /// - the write timeout or attempt cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let base = url::Url::parse(&self.public_base_url)
            .with_context(|| format!("PUBLIC_BASE_URL is not a URL: '{}'", self.public_base_url))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!(
                "PUBLIC_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.public_base_url
            );
        }

        if self.storage_backend == StorageBackend::File && self.links_file.as_os_str().is_empty() {
            anyhow::bail!("LINKS_FILE must not be empty");
        }

        if self.store_write_timeout_ms == 0 {
            anyhow::bail!("STORE_WRITE_TIMEOUT_MS must be greater than 0");
        }

        if self.generator_max_attempts == 0 {
            anyhow::bail!("GENERATOR_MAX_ATTEMPTS must be at least 1");
        }

        Ok(())
    }

    /// Registry tuning derived from this configuration.
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            max_attempts: self.generator_max_attempts,
            write_timeout: Duration::from_millis(self.store_write_timeout_ms),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        match self.storage_backend {
            StorageBackend::File => {
                tracing::info!("  Storage: file ({})", self.links_file.display())
            }
            StorageBackend::Memory => tracing::info!("  Storage: memory (not durable)"),
        }
        tracing::info!("  Public base URL: {}", self.public_base_url);
        tracing::info!("  Write timeout: {} ms", self.store_write_timeout_ms);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses an optional numeric variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
