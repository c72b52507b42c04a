//! HTTP data provider: `GET {base}/api/stock/{SYMBOL}` or
//! `GET {base}/api/chart/{SYMBOL}`.

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Endpoint, HttpProviderConfig};
pub use provider::HttpProvider;
