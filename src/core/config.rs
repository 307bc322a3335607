use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::converter::DEFAULT_MARKUP_FACTOR;
use super::currency::CurrencyCode;
use super::format::ZeroDecimalSet;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarkupConfig {
    #[serde(default = "default_markup_factor")]
    pub factor: f64,
}

fn default_markup_factor() -> f64 {
    DEFAULT_MARKUP_FACTOR
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            factor: DEFAULT_MARKUP_FACTOR,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IpapiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
    pub ipapi: Option<IpapiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: "https://api.exchangerate-api.com".to_string(),
            }),
            ipapi: Some(IpapiProviderConfig {
                base_url: "https://ipapi.co".to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn exchange_rate_url(&self) -> &str {
        self.exchange_rate
            .as_ref()
            .map_or("https://api.exchangerate-api.com", |p| &p.base_url)
    }

    pub fn ipapi_url(&self) -> &str {
        self.ipapi.as_ref().map_or("https://ipapi.co", |p| &p.base_url)
    }
}

fn default_base_currency() -> CurrencyCode {
    CurrencyCode::known("INR")
}

fn default_home_country() -> String {
    "IN".to_string()
}

fn default_enabled_currencies() -> Vec<CurrencyCode> {
    ["USD", "EUR", "GBP", "CAD", "AUD"]
        .into_iter()
        .map(CurrencyCode::known)
        .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Currency the shop's prices are stored in.
    #[serde(default = "default_base_currency")]
    pub base_currency: CurrencyCode,
    /// ISO 3166 country of the merchant. Buyers elsewhere get the markup.
    #[serde(default = "default_home_country")]
    pub home_country: String,
    #[serde(default)]
    pub markup: MarkupConfig,
    #[serde(default)]
    pub zero_decimal_currencies: ZeroDecimalSet,
    #[serde(default)]
    pub show_currency_code: bool,
    /// Used when no enabled currencies can be found on a storefront page.
    #[serde(default = "default_enabled_currencies")]
    pub default_currencies: Vec<CurrencyCode>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            home_country: default_home_country(),
            markup: MarkupConfig::default(),
            zero_decimal_currencies: ZeroDecimalSet::default(),
            show_currency_code: false,
            default_currencies: default_enabled_currencies(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "shopfx", "shopfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "shopfx", "shopfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty document deserializes to unit, not a map.
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn home_country(&self) -> String {
        self.home_country.trim().to_ascii_uppercase()
    }
}
