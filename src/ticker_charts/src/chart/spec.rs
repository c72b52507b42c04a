//! Rendering-library-agnostic chart specifications.
//!
//! A [`ChartSpec`] is what one chart panel needs to be drawn: the ordered
//! traces, a layout map, and annotation shapes. The serialized forms follow
//! the plotting library's native JSON (`{"type": "candlestick", "x": [...]}`
//! traces, `{"data": [...], "layout": {...}}` figures), which is also what the
//! pre-rendered provider endpoint sends.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A named chart rendering target on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Candlestick,
    Rsi,
    Volume,
}

impl PanelId {
    /// Every panel, in page order.
    pub const ALL: [PanelId; 3] = [PanelId::Candlestick, PanelId::Rsi, PanelId::Volume];

    /// The container id this panel renders into.
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Candlestick => "candlestick",
            PanelId::Rsi => "rsi",
            PanelId::Volume => "volume",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light line styling shared by line traces and shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// Open/high/low/close bodies with wicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickTrace {
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A line series. `None` points render as gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTrace {
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

/// Vertical bars, one per x value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One data series of a chart.
///
/// Traces built here are typed. Traces received from the provider inside a
/// pre-rendered figure are kept as [`Trace::Raw`] so every field the plotting
/// library understands (markers, axis bindings, typed arrays) survives
/// untouched. Both serialize to the plotting library's native
/// `{"type": ..., ...}` object; deserializing always yields `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Scatter(LineTrace),
    Bar(BarTrace),
    Raw(Map<String, Value>),
}

/// Trace kind without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Candlestick,
    Line,
    Bar,
    /// Any other plotting-library trace type.
    Other,
}

impl TraceKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "candlestick" => TraceKind::Candlestick,
            "scatter" | "scattergl" => TraceKind::Line,
            "bar" => TraceKind::Bar,
            _ => TraceKind::Other,
        }
    }
}

impl Trace {
    pub fn kind(&self) -> TraceKind {
        match self {
            Trace::Candlestick(_) => TraceKind::Candlestick,
            Trace::Scatter(_) => TraceKind::Line,
            Trace::Bar(_) => TraceKind::Bar,
            // The plotting library defaults a missing type to scatter.
            Trace::Raw(raw) => raw
                .get("type")
                .and_then(Value::as_str)
                .map_or(TraceKind::Line, TraceKind::from_type_name),
        }
    }

    /// Length of the x-axis sequence, when it is a plain JSON array.
    ///
    /// `None` for raw traces without `x` or with a typed-array encoding.
    pub fn x_len(&self) -> Option<usize> {
        match self {
            Trace::Candlestick(t) => Some(t.x.len()),
            Trace::Scatter(t) => Some(t.x.len()),
            Trace::Bar(t) => Some(t.x.len()),
            Trace::Raw(raw) => raw.get("x").and_then(Value::as_array).map(Vec::len),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Candlestick(t) => t.name.as_deref(),
            Trace::Scatter(t) => t.name.as_deref(),
            Trace::Bar(t) => t.name.as_deref(),
            Trace::Raw(raw) => raw.get("name").and_then(Value::as_str),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedTrace<'a> {
    Candlestick(&'a CandlestickTrace),
    Scatter(&'a LineTrace),
    Bar(&'a BarTrace),
}

impl Serialize for Trace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Trace::Candlestick(t) => TaggedTrace::Candlestick(t).serialize(serializer),
            Trace::Scatter(t) => TaggedTrace::Scatter(t).serialize(serializer),
            Trace::Bar(t) => TaggedTrace::Bar(t).serialize(serializer),
            Trace::Raw(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Trace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Trace::Raw)
    }
}

/// Kind of an annotation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rect,
}

/// An annotation shape in data coordinates, e.g. a horizontal threshold line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x0: String,
    pub x1: String,
    pub y0: f64,
    pub y1: f64,
    #[serde(default)]
    pub line: LineStyle,
}

impl Shape {
    /// A horizontal line at `y` spanning `[x0, x1]`.
    pub fn horizontal_line(y: f64, x0: &str, x1: &str, line: LineStyle) -> Self {
        Self {
            kind: ShapeKind::Line,
            x0: x0.to_string(),
            x1: x1.to_string(),
            y0: y,
            y1: y,
            line,
        }
    }
}

/// Chart layout: a free-form configuration map (title, axes, theme, legend).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout(Map<String, Value>);

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` and returns the layout, for chaining.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The chart title, whether stored as a plain string or as `{"text": ..}`.
    pub fn title(&self) -> Option<&str> {
        match self.0.get("title")? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj.get("text").and_then(Value::as_str),
            _ => None,
        }
    }

    /// A copy of this layout with `shapes` appended under the `"shapes"` key.
    pub fn with_shapes(&self, shapes: &[Shape]) -> Layout {
        if shapes.is_empty() {
            return self.clone();
        }
        let mut merged = self.0.clone();
        let mut all = match merged.remove("shapes") {
            Some(Value::Array(existing)) => existing,
            _ => Vec::new(),
        };
        all.extend(
            shapes
                .iter()
                .filter_map(|s| serde_json::to_value(s).ok()),
        );
        merged.insert("shapes".to_string(), Value::Array(all));
        Layout(merged)
    }
}

/// Everything one panel needs to be drawn.
///
/// Immutable once built; holds no reference to the data it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    traces: Vec<Trace>,
    layout: Layout,
    shapes: Vec<Shape>,
}

impl ChartSpec {
    pub fn new(traces: Vec<Trace>, layout: Layout, shapes: Vec<Shape>) -> Self {
        Self {
            traces,
            layout,
            shapes,
        }
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn title(&self) -> Option<&str> {
        self.layout.title()
    }

    /// The layout with this spec's shapes merged in, as the plotting library
    /// expects them.
    pub fn merged_layout(&self) -> Layout {
        self.layout.with_shapes(&self.shapes)
    }

    pub fn to_figure(&self) -> PlotlyFigure {
        PlotlyFigure {
            data: self.traces.clone(),
            layout: self.merged_layout(),
        }
    }
}

/// The plotting library's native figure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyFigure {
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: Layout,
}

/// Takes a figure verbatim: its traces stay raw and its layout, shapes
/// included, is kept as is.
impl From<PlotlyFigure> for ChartSpec {
    fn from(figure: PlotlyFigure) -> Self {
        ChartSpec::new(figure.data, figure.layout, Vec::new())
    }
}
