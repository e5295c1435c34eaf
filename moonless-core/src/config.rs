use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{location::Location, provider::ProviderId};

/// Environment variable that overrides the stored API key of any provider.
pub const API_KEY_ENV: &str = "MOONLESS_API_KEY";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "visualcrossing".
    pub default_provider: Option<String>,

    /// IANA zone last reported for the saved location.
    pub timezone: Option<String>,

    /// Example TOML:
    /// [providers.visualcrossing]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Saved observer location, already rounded.
    pub location: Option<Location>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    ///
    /// Falls back to the first provider with a usable key when none is set.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        self.default_provider_id_with(env_api_key().as_deref())
    }

    fn default_provider_id_with(&self, env_key: Option<&str>) -> Result<ProviderId> {
        if let Some(s) = self.default_provider.as_ref() {
            return ProviderId::try_from(s.as_str());
        }

        ProviderId::all()
            .iter()
            .copied()
            .find(|id| self.api_key_or(*id, env_key).is_some())
            .ok_or_else(|| {
                anyhow!(
                    "No default provider configured.\n\
                     Hint: run `moonless configure <provider>` (e.g. `moonless configure visualcrossing`) first."
                )
            })
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub fn set_timezone(&mut self, timezone: String) {
        self.timezone = Some(timezone);
    }

    /// Saved location, or an error explaining how to set one.
    pub fn require_location(&self) -> Result<Location> {
        self.location.ok_or_else(|| {
            anyhow!(
                "No location configured.\n\
                 Hint: run `moonless set-location <latitude> <longitude>` or pass --lat/--lon."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "moonless", "moonless")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Convenience helper: set/replace a provider API key and optionally set default provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns the stored API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolved_api_key(&self, provider_id: ProviderId) -> Option<String> {
        self.api_key_or(provider_id, env_api_key().as_deref())
    }

    fn api_key_or(&self, provider_id: ProviderId, env_key: Option<&str>) -> Option<String> {
        env_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.provider_api_key(provider_id))
            .map(str::to_owned)
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}
