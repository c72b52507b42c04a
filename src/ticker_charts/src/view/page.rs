//! A self-contained HTML rendition of the chart page.
//!
//! [`Page`] keeps the state of every page element (ticker box, quick buttons,
//! loading and error elements, one plot per panel container) and can write it
//! out as a standalone document that loads the plotting library from a CDN.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::chart::spec::{Layout, PanelId, Trace};
use crate::render::ChartingBackend;
use crate::view::{Surface, quick::QuickTickers};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "\
body { background: #111; color: #ddd; font-family: sans-serif; margin: 1.5em; }
.controls { display: flex; gap: .5em; flex-wrap: wrap; margin-bottom: 1em; }
.btn-ticker.active { background: #2d6cdf; color: #fff; }
#loading { color: #aaa; }
#error { color: #e55; }
.chart { width: 100%; height: 480px; margin-bottom: 1em; }";

#[derive(Debug, Clone)]
struct Plot {
    data: Value,
    layout: Value,
}

/// Page state plus its HTML rendering.
#[derive(Debug, Clone, Default)]
pub struct Page {
    tickers: Vec<String>,
    input: String,
    loading: bool,
    error: Option<String>,
    active: Option<usize>,
    plots: HashMap<String, Plot>,
}

impl Page {
    /// A page with one quick-select button per configured ticker.
    pub fn new(quick: &QuickTickers) -> Self {
        Self {
            tickers: quick.symbols().iter().map(|s| s.to_string()).collect(),
            active: quick.active(),
            ..Self::default()
        }
    }

    pub fn loading_visible(&self) -> bool {
        self.loading
    }

    /// The error text, when the error element is visible.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_ticker(&self) -> Option<usize> {
        self.active
    }

    pub fn ticker_input(&self) -> &str {
        &self.input
    }

    /// Panels that currently hold a plot, in page order.
    pub fn plotted_panels(&self) -> Vec<PanelId> {
        PanelId::ALL
            .into_iter()
            .filter(|p| self.plots.contains_key(p.as_str()))
            .collect()
    }

    /// The layout drawn into `panel`, if any.
    pub fn plotted_layout(&self, panel: PanelId) -> Option<&Value> {
        self.plots.get(panel.as_str()).map(|p| &p.layout)
    }

    /// The number of traces drawn into `panel`.
    pub fn trace_count(&self, panel: PanelId) -> usize {
        self.plots
            .get(panel.as_str())
            .and_then(|p| p.data.as_array())
            .map_or(0, Vec::len)
    }

    /// Writes the whole document.
    pub fn render_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n<title>Stock Charts</title>\n");
        let _ = writeln!(out, "<script src=\"{PLOTLY_CDN}\"></script>");
        let _ = writeln!(out, "<style>\n{STYLE}\n</style>");
        out.push_str("</head>\n<body>\n<div class=\"controls\">\n");
        let _ = writeln!(
            out,
            "<input id=\"ticker\" type=\"text\" placeholder=\"Ticker symbol\" value=\"{}\">",
            escape_html(&self.input)
        );
        out.push_str("<button id=\"submit\">Submit</button>\n");
        for (i, ticker) in self.tickers.iter().enumerate() {
            let class = if self.active == Some(i) {
                "btn-ticker active"
            } else {
                "btn-ticker"
            };
            let ticker = escape_html(ticker);
            let _ = writeln!(
                out,
                "<button class=\"{class}\" data-ticker=\"{ticker}\">{ticker}</button>"
            );
        }
        out.push_str("</div>\n");

        let _ = writeln!(
            out,
            "<div id=\"loading\"{}>Loading...</div>",
            hidden_unless(self.loading)
        );
        let _ = writeln!(
            out,
            "<div id=\"error\"{}>{}</div>",
            hidden_unless(self.error.is_some()),
            escape_html(self.error.as_deref().unwrap_or_default())
        );
        for panel in PanelId::ALL {
            let _ = writeln!(out, "<div id=\"{panel}\" class=\"chart\"></div>");
        }

        out.push_str("<script>\n");
        for panel in PanelId::ALL {
            if let Some(plot) = self.plots.get(panel.as_str()) {
                let _ = writeln!(
                    out,
                    "Plotly.newPlot(\"{panel}\", {}, {});",
                    script_json(&plot.data),
                    script_json(&plot.layout)
                );
            }
        }
        out.push_str("</script>\n</body>\n</html>\n");
        out
    }
}

impl Surface for Page {
    fn set_loading_visible(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn show_error(&mut self, text: &str) {
        self.error = Some(text.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    /// Out-of-range indices leave the current marker alone.
    fn set_active_ticker(&mut self, index: Option<usize>) {
        match index {
            Some(i) if i >= self.tickers.len() => {}
            index => self.active = index,
        }
    }

    fn set_ticker_input(&mut self, text: &str) {
        self.input = text.to_string();
    }
}

impl ChartingBackend for Page {
    fn purge(&mut self, container: &str) {
        self.plots.remove(container);
    }

    fn new_plot(&mut self, container: &str, traces: &[Trace], layout: &Layout) {
        let data = serde_json::to_value(traces).unwrap_or(Value::Array(Vec::new()));
        let layout = Value::Object(layout.as_map().clone());
        self.plots.insert(container.to_string(), Plot { data, layout });
    }
}

fn hidden_unless(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}
