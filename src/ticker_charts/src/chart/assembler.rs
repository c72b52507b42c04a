//! Turns a decoded provider payload into per-panel chart specifications.
//!
//! [`build`] is pure: the same payload and symbol always produce the same
//! panels. Dispatch is on the payload shape:
//!
//! - raw bars, or rich bars without indicators: `candlestick` + `volume`
//! - rich bars with indicators: `candlestick` (with moving averages) + `rsi` +
//!   `volume` (with its moving average)
//! - pre-rendered figures: passed through as `candlestick` + `volume`
//!
//! Within a panel every trace shares the exact same x sequence, the bar dates.

use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::chart::spec::{
    BarTrace, CandlestickTrace, ChartSpec, LineTrace, PanelId, Shape, Trace,
};
use crate::chart::theme;
use crate::models::bar::{Bar, BarError, validate_series};
use crate::models::payload::{IndicatorSet, ProviderPayload};
use crate::models::symbol::Symbol;

/// Panels in page order, each with its chart.
pub type PanelSet = Vec<(PanelId, ChartSpec)>;

/// Name of the volume moving-average trace.
pub const VOLUME_MA_NAME: &str = "Volume MA (20)";

/// The payload can't be charted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssembleError {
    /// There is no valid empty chart.
    #[error("malformed payload: bar sequence is empty")]
    EmptySeries,

    #[error("malformed payload: {0}")]
    InvalidBar(#[from] BarError),
}

/// Builds the chart panels for `payload`, titled with the normalized `symbol`.
pub fn build(payload: &ProviderPayload, symbol: &Symbol) -> Result<PanelSet, AssembleError> {
    debug!(symbol = %symbol, shape = payload.shape_name(), "assembling charts");
    match payload {
        ProviderPayload::RawSeries(bars)
        | ProviderPayload::RichSeries {
            prices: bars,
            indicators: None,
        } => {
            let columns = Columns::from_bars(bars)?;
            Ok(plain_panels(&columns, symbol))
        }
        ProviderPayload::RichSeries {
            prices,
            indicators: Some(indicators),
        } => {
            let columns = Columns::from_bars(prices)?;
            if columns.any_aligned(indicators) {
                Ok(indicator_panels(&columns, indicators, symbol))
            } else {
                debug!(symbol = %symbol, "no indicator series lines up with the bars");
                Ok(plain_panels(&columns, symbol))
            }
        }
        ProviderPayload::PrerenderedSpec {
            candlestick,
            volume,
        } => Ok(vec![
            (PanelId::Candlestick, candlestick.clone()),
            (PanelId::Volume, volume.clone()),
        ]),
    }
}

/// Column-wise view of a validated, non-empty bar sequence.
struct Columns {
    dates: Vec<String>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl Columns {
    fn from_bars(bars: &[Bar]) -> Result<Self, AssembleError> {
        if bars.is_empty() {
            return Err(AssembleError::EmptySeries);
        }
        validate_series(bars)?;
        Ok(Self {
            dates: bars.iter().map(Bar::date_label).collect(),
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            volume: bars.iter().map(|b| b.volume as f64).collect(),
        })
    }

    fn len(&self) -> usize {
        self.dates.len()
    }

    fn first_date(&self) -> &str {
        self.dates.first().map(String::as_str).unwrap_or_default()
    }

    fn last_date(&self) -> &str {
        self.dates.last().map(String::as_str).unwrap_or_default()
    }

    fn candlestick(&self, symbol: &Symbol) -> Trace {
        Trace::Candlestick(CandlestickTrace {
            x: self.dates.clone(),
            open: self.open.clone(),
            high: self.high.clone(),
            low: self.low.clone(),
            close: self.close.clone(),
            name: Some(symbol.to_string()),
        })
    }

    fn volume_bars(&self) -> Trace {
        Trace::Bar(BarTrace {
            x: self.dates.clone(),
            y: self.volume.clone(),
            name: Some("Volume".to_string()),
        })
    }

    fn line(&self, name: &str, y: &[Option<f64>], color: Option<&str>) -> Trace {
        Trace::Scatter(LineTrace {
            x: self.dates.clone(),
            y: y.to_vec(),
            name: Some(name.to_string()),
            mode: Some("lines".to_string()),
            line: Some(theme::thin_line(color)),
        })
    }

    /// Whether at least one indicator series lines up with the bars.
    fn any_aligned(&self, indicators: &IndicatorSet) -> bool {
        let n = self.len();
        indicators.moving_averages.values().any(|v| v.len() == n)
            || indicators.rsi.len() == n
            || indicators.volume_ma.len() == n
    }

    /// `series` if it lines up with the bars, otherwise `None` (logged).
    fn aligned<'a>(&self, name: &str, series: &'a [Option<f64>]) -> Option<&'a [Option<f64>]> {
        if series.len() == self.len() {
            Some(series)
        } else {
            warn!(
                indicator = name,
                expected = self.len(),
                got = series.len(),
                "indicator not aligned with bars; treating as unavailable"
            );
            None
        }
    }
}

fn plain_panels(columns: &Columns, symbol: &Symbol) -> PanelSet {
    vec![
        (PanelId::Candlestick, price_panel(columns, symbol)),
        (PanelId::Volume, volume_panel(columns, symbol)),
    ]
}

fn price_panel(columns: &Columns, symbol: &Symbol) -> ChartSpec {
    ChartSpec::new(
        vec![columns.candlestick(symbol)],
        theme::price_layout(&format!("{symbol} Stock Price")),
        Vec::new(),
    )
}

fn volume_panel(columns: &Columns, symbol: &Symbol) -> ChartSpec {
    ChartSpec::new(
        vec![columns.volume_bars()],
        theme::base_layout(&format!("{symbol} Trading Volume"), "Volume"),
        Vec::new(),
    )
}

fn indicator_panels(columns: &Columns, indicators: &IndicatorSet, symbol: &Symbol) -> PanelSet {
    let mut panels = Vec::with_capacity(3);

    let mut price_traces = vec![columns.candlestick(symbol)];
    for (name, values) in &indicators.moving_averages {
        if let Some(values) = columns.aligned(name, values) {
            price_traces.push(columns.line(name, values, None));
        }
    }
    let price_layout = theme::with_bottom_legend(theme::price_layout(&format!(
        "{symbol} Stock Price with Moving Averages"
    )));
    panels.push((
        PanelId::Candlestick,
        ChartSpec::new(price_traces, price_layout, Vec::new()),
    ));

    if let Some(rsi) = columns.aligned("rsi", &indicators.rsi) {
        panels.push((PanelId::Rsi, rsi_panel(columns, rsi, symbol)));
    }

    let volume = match columns.aligned("volume_ma", &indicators.volume_ma) {
        Some(volume_ma) => ChartSpec::new(
            vec![
                columns.volume_bars(),
                columns.line(VOLUME_MA_NAME, volume_ma, Some(theme::VOLUME_MA_COLOR)),
            ],
            theme::with_bottom_legend(theme::base_layout(
                &format!("{symbol} Trading Volume with Moving Average"),
                "Volume",
            )),
            Vec::new(),
        ),
        None => volume_panel(columns, symbol),
    };
    panels.push((PanelId::Volume, volume));

    panels
}

fn rsi_panel(columns: &Columns, rsi: &[Option<f64>], symbol: &Symbol) -> ChartSpec {
    let layout = theme::base_layout(&format!("{symbol} Relative Strength Index (RSI)"), "RSI")
        .with("yaxis", json!({ "title": "RSI", "range": [0, 100] }));
    let (first, last) = (columns.first_date(), columns.last_date());
    let shapes = vec![
        Shape::horizontal_line(
            theme::OVERBOUGHT_LEVEL,
            first,
            last,
            theme::threshold_line(theme::OVERBOUGHT_COLOR),
        ),
        Shape::horizontal_line(
            theme::OVERSOLD_LEVEL,
            first,
            last,
            theme::threshold_line(theme::OVERSOLD_COLOR),
        ),
    ];
    ChartSpec::new(vec![columns.line("RSI", rsi, None)], layout, shapes)
}
