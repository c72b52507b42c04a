//! Adapter between chart specs and the external plotting capability.

use crate::chart::spec::{ChartSpec, Layout, PanelId, Trace};

/// The plotting library, seen as "draw these traces with this layout into
/// that container".
///
/// Implementations are not expected to fail; a backend that can't draw is a
/// programming error rather than a runtime condition.
pub trait ChartingBackend {
    /// Removes whatever the container currently shows.
    fn purge(&mut self, container: &str);

    /// Draws a fresh plot into the container.
    fn new_plot(&mut self, container: &str, traces: &[Trace], layout: &Layout);
}

/// Clears one panel.
pub fn clear<B: ChartingBackend + ?Sized>(backend: &mut B, panel: PanelId) {
    backend.purge(panel.as_str());
}

/// Clears every panel the page has.
pub fn clear_all<B: ChartingBackend + ?Sized>(backend: &mut B) {
    for panel in PanelId::ALL {
        clear(backend, panel);
    }
}

/// Clears `panel`, then draws `spec` into it with its shapes merged into the
/// layout.
pub fn draw<B: ChartingBackend + ?Sized>(backend: &mut B, panel: PanelId, spec: ChartSpec) {
    clear(backend, panel);
    backend.new_plot(panel.as_str(), spec.traces(), &spec.merged_layout());
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::chart::spec::{LineStyle, Shape};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        last_layout: Option<Layout>,
    }

    impl ChartingBackend for Recorder {
        fn purge(&mut self, container: &str) {
            self.calls.push(format!("purge {container}"));
        }

        fn new_plot(&mut self, container: &str, traces: &[Trace], layout: &Layout) {
            self.calls.push(format!("plot {container} ({} traces)", traces.len()));
            self.last_layout = Some(layout.clone());
        }
    }

    #[test]
    fn draw_clears_before_plotting() {
        let mut backend = Recorder::default();
        let spec = ChartSpec::new(vec![], Layout::new(), vec![]);
        draw(&mut backend, PanelId::Volume, spec);
        assert_eq!(backend.calls, ["purge volume", "plot volume (0 traces)"]);
    }

    #[test]
    fn draw_merges_shapes_into_layout() {
        let mut backend = Recorder::default();
        let shape = Shape::horizontal_line(70.0, "2024-01-01", "2024-01-31", LineStyle::default());
        let spec = ChartSpec::new(vec![], Layout::new().with("title", json!("RSI")), vec![shape]);
        draw(&mut backend, PanelId::Rsi, spec);

        let layout = backend.last_layout.unwrap();
        let shapes = layout.get("shapes").and_then(Value::as_array).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0]["x1"], json!("2024-01-31"));
        assert_eq!(layout.title(), Some("RSI"));
    }

    #[test]
    fn clear_all_purges_every_panel() {
        let mut backend = Recorder::default();
        clear_all(&mut backend);
        assert_eq!(backend.calls, ["purge candlestick", "purge rsi", "purge volume"]);
    }
}
