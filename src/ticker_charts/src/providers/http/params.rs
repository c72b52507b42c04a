use std::{num::NonZeroU32, time::Duration};

use reqwest::Url;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Which provider route to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `/api/stock/{SYMBOL}`: bars, optionally with indicators.
    #[default]
    Stock,
    /// `/api/chart/{SYMBOL}`: figures already built by the server.
    Chart,
}

impl Endpoint {
    /// The path segments placed between the base URL and the symbol.
    pub fn segments(&self) -> [&'static str; 2] {
        match self {
            Endpoint::Stock => ["api", "stock"],
            Endpoint::Chart => ["api", "chart"],
        }
    }
}

/// Settings for [`HttpProvider`](super::HttpProvider).
#[derive(Clone, Debug)]
pub struct HttpProviderConfig {
    /// Scheme, host and optional path prefix of the data service.
    pub base_url: Url,
    pub endpoint: Endpoint,
    /// Whole-request timeout; an expired timeout is a transport error.
    pub timeout: Duration,
    /// Client-side throttle. `None` disables it.
    pub requests_per_second: Option<NonZeroU32>,
    /// Sent as `Authorization: Bearer ...` when present.
    pub api_token: Option<SecretString>,
}

impl HttpProviderConfig {
    pub fn new(base_url: Url, endpoint: Endpoint) -> Self {
        Self {
            base_url,
            endpoint,
            timeout: Duration::from_secs(10),
            requests_per_second: None,
            api_token: None,
        }
    }
}
