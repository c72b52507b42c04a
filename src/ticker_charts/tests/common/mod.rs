#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use ticker_charts::{
    chart::spec::{Layout, Trace},
    models::{bar::Bar, payload::ProviderPayload, symbol::Symbol},
    providers::{
        DataProvider,
        errors::{HttpSnafu, ProviderError},
    },
    render::ChartingBackend,
    view::{QuickTickers, Surface},
};
use tokio::sync::{mpsc, oneshot};

pub type Outcome = Result<ProviderPayload, ProviderError>;

/// Shared, ordered record of everything the view and provider were asked to do.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A view that only records calls.
#[derive(Default)]
pub struct RecordingView {
    pub log: CallLog,
    pub plots: HashMap<String, (Vec<Trace>, Layout)>,
    pub loading: bool,
    pub error: Option<String>,
    pub active: Option<usize>,
}

impl RecordingView {
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }
}

impl Surface for RecordingView {
    fn set_loading_visible(&mut self, visible: bool) {
        self.loading = visible;
        self.record(format!("loading {}", if visible { "on" } else { "off" }));
    }

    fn show_error(&mut self, text: &str) {
        self.error = Some(text.to_string());
        self.record(format!("error {text}"));
    }

    fn hide_error(&mut self) {
        self.error = None;
        self.record("error hidden".to_string());
    }

    fn set_active_ticker(&mut self, index: Option<usize>) {
        self.active = index;
        self.record(format!("active {index:?}"));
    }
}

impl ChartingBackend for RecordingView {
    fn purge(&mut self, container: &str) {
        self.plots.remove(container);
        self.record(format!("purge {container}"));
    }

    fn new_plot(&mut self, container: &str, traces: &[Trace], layout: &Layout) {
        self.plots
            .insert(container.to_string(), (traces.to_vec(), layout.clone()));
        self.record(format!("plot {container}"));
    }
}

/// Answers each symbol with a fixed outcome, recording every fetch.
pub struct ScriptedProvider {
    log: CallLog,
    responses: HashMap<String, Box<dyn Fn() -> Outcome + Send + Sync>>,
}

impl ScriptedProvider {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            responses: HashMap::new(),
        }
    }

    pub fn bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.responses.insert(
            symbol.to_string(),
            Box::new(move || Ok(ProviderPayload::RawSeries(bars.clone()))),
        );
        self
    }

    pub fn payload(mut self, symbol: &str, payload: ProviderPayload) -> Self {
        self.responses
            .insert(symbol.to_string(), Box::new(move || Ok(payload.clone())));
        self
    }
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn fetch(&self, symbol: &Symbol) -> Outcome {
        self.log.lock().unwrap().push(format!("fetch {symbol}"));
        match self.responses.get(symbol.as_str()) {
            Some(respond) => respond(),
            None => HttpSnafu { status: 404u16 }.fail(),
        }
    }
}

/// Holds each fetch until the test releases its gate, so requests can be
/// completed in any order.
pub struct GatedProvider {
    gates: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    requested: mpsc::UnboundedSender<String>,
}

impl GatedProvider {
    /// Returns the provider, the release handle per symbol and a stream of
    /// requested symbols.
    pub fn new(
        symbols: &[&str],
    ) -> (
        Self,
        HashMap<String, oneshot::Sender<Outcome>>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let mut gates = HashMap::new();
        let mut releases = HashMap::new();
        for symbol in symbols {
            let (tx, rx) = oneshot::channel();
            gates.insert(symbol.to_string(), rx);
            releases.insert(symbol.to_string(), tx);
        }
        let (requested, requests) = mpsc::unbounded_channel();
        let provider = Self {
            gates: Mutex::new(gates),
            requested,
        };
        (provider, releases, requests)
    }
}

#[async_trait]
impl DataProvider for GatedProvider {
    async fn fetch(&self, symbol: &Symbol) -> Outcome {
        let gate = self.gates.lock().unwrap().remove(symbol.as_str());
        let _ = self.requested.send(symbol.to_string());
        match gate {
            Some(gate) => match gate.await {
                Ok(outcome) => outcome,
                Err(_) => HttpSnafu { status: 503u16 }.fail(),
            },
            None => HttpSnafu { status: 404u16 }.fail(),
        }
    }
}

pub fn bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 100.0 + i as f64;
            Bar {
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: base,
                high: base + 5.0,
                low: base - 1.0,
                close: base + 3.0,
                volume: 1000 + i as u64 * 10,
            }
        })
        .collect()
}

pub fn quick() -> QuickTickers {
    QuickTickers::parse(&["AAPL", "MSFT", "GOOGL"]).unwrap()
}
