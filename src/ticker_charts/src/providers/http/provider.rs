use std::sync::Arc;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{Client, Url, header};
use secrecy::ExposeSecret;
use snafu::{OptionExt as _, ResultExt as _};
use tracing::debug;

use crate::models::{payload::ProviderPayload, symbol::Symbol};
use crate::providers::{
    DataProvider,
    errors::{
        ClientBuildSnafu, HttpSnafu, InvalidApiTokenSnafu, ProviderError, ProviderInitError,
        TransportSnafu, UnusableBaseUrlSnafu,
    },
    http::{
        params::{Endpoint, HttpProviderConfig},
        response::decode_payload,
    },
};

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Fetches chart data from the HTTP data service.
pub struct HttpProvider {
    client: Client,
    base_url: Url,
    endpoint: Endpoint,
    limiter: Option<Arc<Limiter>>,
}

impl HttpProvider {
    /// Creates a provider from its settings.
    ///
    /// Fails if the base URL can't carry a path, the API token isn't a valid
    /// header value, or the HTTP client can't be built.
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderInitError> {
        if config.base_url.cannot_be_a_base() {
            return UnusableBaseUrlSnafu {
                url: config.base_url.to_string(),
            }
            .fail();
        }

        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value =
                header::HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .context(InvalidApiTokenSnafu)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        let limiter = config
            .requests_per_second
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));

        Ok(Self {
            client,
            base_url: config.base_url,
            endpoint: config.endpoint,
            limiter,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// `{base}/api/{stock|chart}/{SYMBOL}`, with the symbol percent-encoded as
    /// a single path segment.
    pub fn endpoint_url(&self, symbol: &Symbol) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.endpoint.segments())
                .push(symbol.as_str());
        }
        url
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn fetch(&self, symbol: &Symbol) -> Result<ProviderPayload, ProviderError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = self.endpoint_url(symbol);
        debug!(%url, "requesting chart data");

        let response = self.client.get(url).send().await.context(TransportSnafu)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "provider rejected request");
            return HttpSnafu {
                status: status.as_u16(),
            }
            .fail();
        }

        let body = response.bytes().await.context(TransportSnafu)?;
        let payload = decode_payload(&body)?;
        debug!(
            shape = payload.shape_name(),
            bars = payload.bars().map_or(0, <[_]>::len),
            bytes = body.len(),
            "decoded payload"
        );
        Ok(payload)
    }
}

/// Parses `raw` as an absolute http(s) base URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ProviderInitError> {
    let url = Url::parse(raw).ok().context(UnusableBaseUrlSnafu { url: raw })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return UnusableBaseUrlSnafu { url: raw }.fail();
    }
    Ok(url)
}
