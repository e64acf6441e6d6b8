//! Client and application configuration.
//!
//! `ClientConfig` holds transport settings for the AKSes service.
//! `Config` is the persisted CLI configuration stored at
//! `~/.config/ksei/config.json`, with environment overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "ksei";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Base URL of the AKSes REST service.
pub const DEFAULT_BASE_URL: &str = "https://akses.ksei.co.id/service";

/// Referer the portal expects on every request.
pub const DEFAULT_REFERER: &str = "https://akses.ksei.co.id";

/// HTTP request timeout in seconds.
/// 30s allows for slow portal responses while still failing a stuck branch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Transport settings
// ============================================================================

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub referer: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Point the client at a different service root (trailing slash ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Persisted application config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_username: Option<String>,
    pub auth_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub plain_password: Option<bool>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The config to write back after a run: the stored values with only
    /// the username updated. Environment overrides stay out of the file.
    pub fn remember_username(&self, username: &str) -> Self {
        Self {
            last_username: Some(username.to_string()),
            ..self.clone()
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `KSEI_*` environment variables over the loaded values.
    /// The result is for this run only; persist with [`Config::remember_username`].
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Blank values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(username) = get("KSEI_USERNAME") {
            self.last_username = Some(username);
        }
        if let Some(dir) = get("KSEI_AUTH_PATH") {
            self.auth_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = get("KSEI_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("KSEI_TIMEOUT_SECS is not a number: {}", secs))?;
            self.timeout_secs = Some(secs);
        }
        if let Some(flag) = get("KSEI_PLAIN_PASSWORD") {
            self.plain_password = Some(parse_bool(&flag).with_context(|| {
                format!("KSEI_PLAIN_PASSWORD must be true or false, got {}", flag)
            })?);
        }
        Ok(self)
    }

    /// Directory holding persisted credentials and CLI output.
    pub fn auth_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.auth_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("auth"))
    }

    pub fn plain_password(&self) -> bool {
        self.plain_password.unwrap_or(true)
    }

    pub fn client_config(&self) -> ClientConfig {
        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        ClientConfig::default().with_timeout(timeout)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
