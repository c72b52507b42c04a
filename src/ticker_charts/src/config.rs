//! Application configuration: a TOML file plus environment overrides.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration that talks to a local data service:
//!
//! ```toml
//! [provider]
//! base_url = "http://127.0.0.1:8000"
//! endpoint = "stock"        # or "chart"
//! timeout_secs = 10
//! # requests_per_second = 5
//!
//! [view]
//! default_symbol = "AAPL"
//! quick_tickers = ["AAPL", "MSFT", "GOOGL", "AMZN", "META"]
//! output = "charts.html"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! `TICKER_CHARTS_BASE_URL` replaces `provider.base_url`;
//! `TICKER_CHARTS_API_TOKEN`, when set, is sent as a bearer token.

use std::{num::NonZeroU32, path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shared_utils::env::optional_env_var;

use crate::models::symbol::Symbol;
use crate::providers::http::{Endpoint, HttpProviderConfig, provider::parse_base_url};
use crate::view::QuickTickers;

pub const BASE_URL_ENV: &str = "TICKER_CHARTS_BASE_URL";
pub const API_TOKEN_ENV: &str = "TICKER_CHARTS_API_TOKEN";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub provider: ProviderSection,
    pub view: ViewSection,
    pub logging: LoggingSection,

    /// Bearer token, from the environment only.
    #[serde(skip)]
    pub api_token: Option<SecretString>,
}

/// `[provider]`: where chart data comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSection {
    pub base_url: String,
    pub endpoint: Endpoint,
    pub timeout_secs: u64,
    pub requests_per_second: Option<NonZeroU32>,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            endpoint: Endpoint::Stock,
            timeout_secs: 10,
            requests_per_second: None,
        }
    }
}

/// `[view]`: what the page shows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSection {
    /// Loaded when the page activates.
    pub default_symbol: String,
    pub quick_tickers: Vec<String>,
    /// Where the rendered page is written.
    pub output: PathBuf,
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            quick_tickers: ["AAPL", "MSFT", "GOOGL", "AMZN", "META"]
                .map(String::from)
                .to_vec(),
            output: PathBuf::from("charts.html"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// An `EnvFilter` directive, e.g. `"info"` or `"ticker_charts=debug"`.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parses a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("parse config TOML")
    }

    /// Reads `path` (defaults when `None`), applies environment overrides and
    /// validates the result.
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read config file {}", path.display()))?;
                Self::from_toml_str(&text)
                    .with_context(|| format!("load config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Applies `TICKER_CHARTS_BASE_URL` and `TICKER_CHARTS_API_TOKEN`.
    pub fn apply_env(&mut self) {
        if let Some(url) = optional_env_var(BASE_URL_ENV) {
            self.provider.base_url = url;
        }
        if let Some(token) = optional_env_var(API_TOKEN_ENV) {
            self.api_token = Some(SecretString::from(token));
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        parse_base_url(&self.provider.base_url)
            .with_context(|| format!("invalid provider.base_url {:?}", self.provider.base_url))?;
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be greater than zero");
        }
        self.default_symbol()?;
        self.quick_tickers()?;
        Ok(())
    }

    pub fn default_symbol(&self) -> anyhow::Result<Symbol> {
        Symbol::parse(&self.view.default_symbol).context("invalid view.default_symbol")
    }

    pub fn quick_tickers(&self) -> anyhow::Result<QuickTickers> {
        QuickTickers::parse(&self.view.quick_tickers).context("invalid view.quick_tickers")
    }

    /// Settings for the HTTP provider.
    pub fn http_provider(&self) -> anyhow::Result<HttpProviderConfig> {
        let base_url = parse_base_url(&self.provider.base_url)
            .with_context(|| format!("invalid provider.base_url {:?}", self.provider.base_url))?;
        let mut http = HttpProviderConfig::new(base_url, self.provider.endpoint);
        http.timeout = Duration::from_secs(self.provider.timeout_secs);
        http.requests_per_second = self.provider.requests_per_second;
        http.api_token = self.api_token.clone();
        Ok(http)
    }
}
