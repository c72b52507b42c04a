//! The page side: what the user sees and the controller that drives it.

pub mod controller;
pub mod page;
pub mod quick;

pub use controller::{RequestState, Settlement, Ticket, ViewController};
pub use page::Page;
pub use quick::QuickTickers;

use crate::render::ChartingBackend;

/// The non-chart page elements the controller toggles.
pub trait Surface {
    fn set_loading_visible(&mut self, visible: bool);

    /// Shows the error element with `text`.
    fn show_error(&mut self, text: &str);

    fn hide_error(&mut self);

    /// Marks exactly one quick-ticker button active, or none.
    fn set_active_ticker(&mut self, index: Option<usize>);

    /// Mirrors the ticker text box. Surfaces without a text box ignore it.
    fn set_ticker_input(&mut self, _text: &str) {}
}

/// A full page: status elements plus chart containers.
pub trait View: Surface + ChartingBackend {}

impl<T: Surface + ChartingBackend> View for T {}
