//! Provider abstraction for chart data sources.
//!
//! This module defines the [`DataProvider`] trait, the single seam between the
//! view controller and wherever bars/indicators/pre-rendered charts come from.
//! The HTTP implementation lives in [`http`]; tests substitute scripted
//! providers.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn DataProvider`) so the endpoint flavour can be picked at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use ticker_charts::models::{payload::ProviderPayload, symbol::Symbol};
//! use ticker_charts::providers::{DataProvider, errors::ProviderError};
//!
//! struct EmptyProvider;
//!
//! #[async_trait]
//! impl DataProvider for EmptyProvider {
//!     async fn fetch(&self, _symbol: &Symbol) -> Result<ProviderPayload, ProviderError> {
//!         Ok(ProviderPayload::RawSeries(vec![]))
//!     }
//! }
//! ```

pub mod errors;
pub mod http;

use async_trait::async_trait;

use crate::models::{payload::ProviderPayload, symbol::Symbol};
use crate::providers::errors::ProviderError;

/// Fetches the chart data for one symbol.
///
/// Implementations issue a single request and return the decoded payload
/// untouched; building charts from it is the assembler's job.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the payload for an already-normalized `symbol`.
    async fn fetch(&self, symbol: &Symbol) -> Result<ProviderPayload, ProviderError>;
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::providers::errors::HttpSnafu;

    struct AlwaysEmpty;
    struct AlwaysMissing;

    #[async_trait]
    impl DataProvider for AlwaysEmpty {
        async fn fetch(&self, _symbol: &Symbol) -> Result<ProviderPayload, ProviderError> {
            Ok(ProviderPayload::RawSeries(vec![]))
        }
    }

    #[async_trait]
    impl DataProvider for AlwaysMissing {
        async fn fetch(&self, _symbol: &Symbol) -> Result<ProviderPayload, ProviderError> {
            HttpSnafu { status: 404u16 }.fail()
        }
    }

    // Picks the provider at runtime; only works through `Box<dyn DataProvider>`.
    fn get_provider(name: &str) -> Box<dyn DataProvider> {
        if name == "empty" {
            Box::new(AlwaysEmpty)
        } else {
            Box::new(AlwaysMissing)
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let symbol = Symbol::parse("aapl").unwrap();

        let result = get_provider("empty").fetch(&symbol).await;
        assert!(matches!(result, Ok(ProviderPayload::RawSeries(bars)) if bars.is_empty()));

        let result = get_provider("missing").fetch(&symbol).await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }
}
