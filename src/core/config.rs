use super::catalog::{CurrencyCatalog, CurrencyPair};
use super::history::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use super::session::DEFAULT_FETCH_TIMEOUT;
use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_CODE: &str = "USD";
// Not an ISO 4217 code: rejected by the catalog at startup.
pub const DEFAULT_QUOTE_CODE: &str = "CDN";
pub const DEFAULT_API_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: DEFAULT_API_URL.to_string(),
            }),
        }
    }
}

fn default_history_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub base: Option<String>,
    pub quote: Option<String>,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            base: None,
            quote: None,
            history_days: default_history_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "divisa", "divisa")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_WINDOW_DAYS).contains(&self.history_days),
            "history_days must be between 1 and {MAX_WINDOW_DAYS}, got {}",
            self.history_days
        );
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.providers
            .frankfurter
            .as_ref()
            .map_or(DEFAULT_API_URL, |p| &p.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves the starting pair: explicit parameters win over the config
    /// file, which wins over the built-in defaults. Every code is checked
    /// against the catalog.
    pub fn initial_pair(
        &self,
        catalog: &CurrencyCatalog,
        base: Option<&str>,
        quote: Option<&str>,
    ) -> Result<CurrencyPair> {
        let raw_base = base
            .or(self.base.as_deref())
            .unwrap_or(DEFAULT_BASE_CODE);
        let raw_quote = quote
            .or(self.quote.as_deref())
            .unwrap_or(DEFAULT_QUOTE_CODE);

        let base = catalog.code(raw_base).with_context(|| {
            format!("Invalid base currency '{raw_base}'; pass --base or set `base` in the config file")
        })?;
        let quote = catalog.code(raw_quote).with_context(|| {
            format!("Invalid quote currency '{raw_quote}'; pass --quote or set `quote` in the config file")
        })?;
        Ok(CurrencyPair::new(base, quote))
    }
}
