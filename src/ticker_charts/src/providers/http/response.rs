//! Wire shapes of the provider's JSON bodies and shape detection.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::chart::spec::{ChartSpec, PlotlyFigure};
use crate::models::bar::Bar;
use crate::models::payload::{IndicatorSet, ProviderPayload};
use crate::providers::errors::{MalformedPayloadSnafu, ProviderError};

#[derive(Deserialize, Debug)]
pub struct RichResponse {
    pub prices: Vec<Bar>,
    #[serde(default)]
    pub indicators: Option<IndicatorSet>,
}

/// Reads one embedded figure. The chart endpoint double-encodes figures as
/// JSON strings; inline objects are accepted too. Only the `data`/`layout`
/// structure is checked, traces and layout stay verbatim.
fn embedded_figure(obj: &Map<String, Value>, field: &str) -> Result<ChartSpec, ProviderError> {
    let figure = match obj.get(field) {
        Some(Value::String(text)) => serde_json::from_str::<PlotlyFigure>(text)
            .map_err(|e| malformed(format!("`{field}` is not a JSON-encoded figure: {e}")))?,
        Some(value @ Value::Object(_)) => PlotlyFigure::deserialize(value)
            .map_err(|e| malformed(format!("`{field}` is not a figure object: {e}")))?,
        Some(other) => {
            return Err(malformed(format!(
                "`{field}` must be a figure object or a JSON string, got {}",
                json_type(other)
            )));
        }
        None => return Err(malformed(format!("missing `{field}`"))),
    };
    Ok(ChartSpec::from(figure))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a 2xx response body into whichever payload shape it holds.
///
/// - a JSON array is a raw bar series
/// - an object with `prices` is a rich series
/// - an object with `candlestick` and `volume` holds pre-rendered figures
pub fn decode_payload(body: &[u8]) -> Result<ProviderPayload, ProviderError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| malformed(format!("response body is not JSON: {e}")))?;

    match &value {
        Value::Array(_) => {
            let bars = serde_json::from_value::<Vec<Bar>>(value)
                .map_err(|e| malformed(format!("invalid bar series: {e}")))?;
            Ok(ProviderPayload::RawSeries(bars))
        }
        Value::Object(obj) if obj.contains_key("prices") => {
            let rich = serde_json::from_value::<RichResponse>(value)
                .map_err(|e| malformed(format!("invalid price/indicator payload: {e}")))?;
            Ok(ProviderPayload::RichSeries {
                prices: rich.prices,
                indicators: rich.indicators,
            })
        }
        Value::Object(obj) if obj.contains_key("candlestick") && obj.contains_key("volume") => {
            Ok(ProviderPayload::PrerenderedSpec {
                candlestick: embedded_figure(obj, "candlestick")?,
                volume: embedded_figure(obj, "volume")?,
            })
        }
        Value::Object(_) => Err(malformed(
            "object has neither `prices` nor `candlestick`/`volume`",
        )),
        _ => Err(malformed("expected a JSON array or object")),
    }
}

fn malformed(detail: impl Into<String>) -> ProviderError {
    MalformedPayloadSnafu {
        detail: detail.into(),
    }
    .build()
}
