use snafu::{Backtrace, Snafu};

use crate::errors::ErrorKind;

/// Errors that can occur when a provider client is constructed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// Failed to init reqwest client.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API token contains characters not allowed in a header.
    #[snafu(display("Invalid API token format: {source}"))]
    InvalidApiToken {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// The base URL can't carry path segments (e.g. `mailto:`).
    #[snafu(display("Base URL cannot be used for API requests: {url}"))]
    UnusableBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[snafu(display("HTTP error! status: {status}"))]
    Http { status: u16, backtrace: Backtrace },

    /// An error during the request itself (DNS, timeout, connection reset).
    #[snafu(display("Network request failed: {source}"))]
    Transport {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A 2xx body that isn't one of the supported payload shapes.
    #[snafu(display("malformed payload: {detail}"))]
    MalformedPayload { detail: String, backtrace: Backtrace },
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Http { .. } => ErrorKind::Http,
            ProviderError::Transport { .. } => ErrorKind::Transport,
            ProviderError::MalformedPayload { .. } => ErrorKind::MalformedPayload,
        }
    }

    /// The HTTP status, for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
