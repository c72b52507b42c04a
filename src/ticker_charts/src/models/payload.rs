//! Provider response shapes, after decoding.
//!
//! The data provider may answer with one of three shapes; the client decodes
//! whichever arrived into a [`ProviderPayload`] and the chart assembler
//! dispatches on the variant.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::chart::spec::ChartSpec;
use crate::models::bar::Bar;

/// A decoded provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// `{ prices: Bar[], indicators?: {...} }` from the stock endpoint.
    RichSeries {
        prices: Vec<Bar>,
        indicators: Option<IndicatorSet>,
    },

    /// `{ candlestick: <figure>, volume: <figure> }` from the chart endpoint;
    /// the provider already built both charts.
    PrerenderedSpec {
        candlestick: ChartSpec,
        volume: ChartSpec,
    },

    /// A bare `Bar[]` with no indicators.
    RawSeries(Vec<Bar>),
}

impl ProviderPayload {
    /// Short shape name used in logs.
    pub fn shape_name(&self) -> &'static str {
        match self {
            ProviderPayload::RichSeries { .. } => "rich",
            ProviderPayload::PrerenderedSpec { .. } => "prerendered",
            ProviderPayload::RawSeries(_) => "raw",
        }
    }

    /// The bar sequence, if this shape carries one.
    pub fn bars(&self) -> Option<&[Bar]> {
        match self {
            ProviderPayload::RichSeries { prices, .. } => Some(prices),
            ProviderPayload::RawSeries(bars) => Some(bars),
            ProviderPayload::PrerenderedSpec { .. } => None,
        }
    }
}

/// Indicators precomputed by the provider, aligned 1:1 with the bar sequence
/// by position.
///
/// Values are `None` where the indicator is undefined (e.g. the first bars of
/// a rolling window). A series whose length differs from the bar count means
/// the provider lacked history for it; the assembler treats it as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Moving averages keyed by name (e.g. `"MA_20"`), in provider order.
    #[serde(default)]
    pub moving_averages: IndexMap<String, Vec<Option<f64>>>,

    /// Momentum oscillator, bounded to `[0, 100]`.
    #[serde(default)]
    pub rsi: Vec<Option<f64>>,

    /// Moving average of traded volume.
    #[serde(default)]
    pub volume_ma: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_order_follows_the_document() {
        let json = r#"{
            "moving_averages": {"MA_50": [null, 2.0], "MA_20": [1.0, 2.0], "MA_200": [null, null]},
            "rsi": [55.0, 60.5],
            "volume_ma": [null, 1200.0]
        }"#;
        let set: IndicatorSet = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = set.moving_averages.keys().map(String::as_str).collect();
        assert_eq!(keys, ["MA_50", "MA_20", "MA_200"]);
        assert_eq!(set.rsi, vec![Some(55.0), Some(60.5)]);
        assert_eq!(set.volume_ma[0], None);
    }

    #[test]
    fn missing_indicator_fields_default_to_empty() {
        let set: IndicatorSet = serde_json::from_str("{}").unwrap();
        assert!(set.moving_averages.is_empty());
        assert!(set.rsi.is_empty());
        assert!(set.volume_ma.is_empty());
    }
}
