//! Shared visual theme: every panel uses the same dark template and axis
//! conventions so the stacked charts read as one view.

use serde_json::json;

use crate::chart::spec::{Layout, LineStyle};

/// Plotting-library template applied to every layout.
pub const TEMPLATE: &str = "plotly_dark";

/// Momentum oscillator thresholds.
pub const OVERBOUGHT_LEVEL: f64 = 70.0;
pub const OVERSOLD_LEVEL: f64 = 30.0;

pub const OVERBOUGHT_COLOR: &str = "red";
pub const OVERSOLD_COLOR: &str = "green";
pub const VOLUME_MA_COLOR: &str = "orange";

/// Width of overlay lines and threshold shapes.
pub const THIN_LINE: f64 = 1.0;

/// Layout skeleton shared by all panels: title, date x-axis, dark template.
pub fn base_layout(title: &str, y_axis_title: &str) -> Layout {
    Layout::new()
        .with("title", json!(title))
        .with("xaxis", json!({ "title": "Date" }))
        .with("yaxis", json!({ "title": y_axis_title }))
        .with("template", json!(TEMPLATE))
}

/// Price axis in dollars.
pub fn price_layout(title: &str) -> Layout {
    base_layout(title, "Stock Price (USD)")
        .with("yaxis", json!({ "title": "Stock Price (USD)", "tickprefix": "$" }))
}

/// Horizontal legend below the plot area.
pub fn with_bottom_legend(layout: Layout) -> Layout {
    layout.with("legend", json!({ "orientation": "h", "y": -0.2 }))
}

pub fn thin_line(color: Option<&str>) -> LineStyle {
    LineStyle {
        color: color.map(str::to_string),
        width: Some(THIN_LINE),
        dash: None,
    }
}

pub fn threshold_line(color: &str) -> LineStyle {
    LineStyle {
        color: Some(color.to_string()),
        width: Some(THIN_LINE),
        dash: Some("dash".to_string()),
    }
}
