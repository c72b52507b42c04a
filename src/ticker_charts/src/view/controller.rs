//! Request/render state machine.
//!
//! ```text
//! Idle -> Loading(s) -> Loaded(s) | Failed(s, msg) -> Loading(next) -> ...
//! ```
//!
//! A request is split in two halves so an event loop can interleave them:
//! [`ViewController::begin`] normalizes the input, enters `Loading` and hands
//! back a [`Ticket`]; [`ViewController::settle`] takes the ticket together with
//! the fetch outcome. Only the most recently issued ticket is honoured; a
//! late response for an older one is discarded without touching the page.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chart::assembler;
use crate::chart::spec::PanelId;
use crate::errors::LoadError;
use crate::models::{payload::ProviderPayload, symbol::Symbol};
use crate::providers::{DataProvider, errors::ProviderError};
use crate::render;
use crate::view::{View, quick::QuickTickers};

/// What the page currently reflects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading(Symbol),
    Loaded(Symbol),
    /// The symbol and the message shown to the user (`"Error: ..."`).
    Failed(Symbol, String),
}

impl RequestState {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            RequestState::Idle => None,
            RequestState::Loading(s) | RequestState::Loaded(s) | RequestState::Failed(s, _) => {
                Some(s)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading(_))
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    symbol: Symbol,
}

impl Ticket {
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}

/// How a ticket was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Every panel for the symbol was drawn.
    Rendered { symbol: Symbol, panels: Vec<PanelId> },
    /// Nothing was drawn; the error element shows `message`.
    Failed { symbol: Symbol, message: String },
    /// A newer request was issued meanwhile; the outcome was dropped.
    Superseded { symbol: Symbol },
}

/// Orchestrates normalize -> loading -> fetch -> assemble -> draw.
pub struct ViewController<V> {
    provider: Arc<dyn DataProvider>,
    view: V,
    quick: QuickTickers,
    state: RequestState,
    issued: u64,
    awaiting: Option<u64>,
}

impl<V: View> ViewController<V> {
    pub fn new(provider: Arc<dyn DataProvider>, view: V, quick: QuickTickers) -> Self {
        Self {
            provider,
            view,
            quick,
            state: RequestState::Idle,
            issued: 0,
            awaiting: None,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn quick_tickers(&self) -> &QuickTickers {
        &self.quick
    }

    pub fn provider(&self) -> Arc<dyn DataProvider> {
        Arc::clone(&self.provider)
    }

    /// Whether a request's outcome is still awaited.
    pub fn is_pending(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Mirrors the text box contents onto the view.
    pub fn set_input(&mut self, text: &str) {
        self.view.set_ticker_input(text);
    }

    /// Starts a request for `raw`.
    ///
    /// Blank input is ignored (no transition, `None`). Otherwise the loading
    /// indicator is shown, the error hidden and every chart panel cleared
    /// before the ticket is returned; the caller then fetches and calls
    /// [`settle`](Self::settle).
    pub fn begin(&mut self, raw: &str) -> Option<Ticket> {
        let symbol = match Symbol::parse(raw) {
            Ok(symbol) => symbol,
            Err(e) => {
                debug!(input = raw, "ignoring submit: {e}");
                return None;
            }
        };

        self.issued += 1;
        let ticket = Ticket {
            id: self.issued,
            symbol: symbol.clone(),
        };
        if self.awaiting.replace(ticket.id).is_some() {
            debug!(symbol = %symbol, "superseding in-flight request");
        }

        self.view.set_loading_visible(true);
        self.view.hide_error();
        render::clear_all(&mut self.view);
        self.state = RequestState::Loading(symbol);
        info!(symbol = %ticket.symbol, request = ticket.id, "loading");

        Some(ticket)
    }

    /// Presses quick-ticker button `index` and starts a request for its
    /// symbol. Out-of-range indices do nothing.
    pub fn press_quick_ticker(&mut self, index: usize) -> Option<Ticket> {
        let symbol = self.quick.press(index)?;
        self.view.set_active_ticker(Some(index));
        self.begin(symbol.as_str())
    }

    /// Applies the outcome of the fetch issued for `ticket`.
    ///
    /// Stale tickets are discarded. For the current one, either every panel
    /// is drawn or none is and the error element shows the message; in both
    /// cases the loading indicator is hidden afterwards.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<ProviderPayload, ProviderError>,
    ) -> Settlement {
        if self.awaiting != Some(ticket.id) {
            info!(symbol = %ticket.symbol, request = ticket.id, "discarding stale response");
            return Settlement::Superseded {
                symbol: ticket.symbol,
            };
        }
        self.awaiting = None;

        let Ticket { symbol, .. } = ticket;
        let built = outcome
            .map_err(LoadError::from)
            .and_then(|payload| assembler::build(&payload, &symbol).map_err(LoadError::from));

        let settlement = match built {
            Ok(panels) => {
                let ids: Vec<PanelId> = panels.iter().map(|(id, _)| *id).collect();
                for (id, spec) in panels {
                    render::draw(&mut self.view, id, spec);
                }
                info!(symbol = %symbol, panels = ids.len(), "rendered");
                self.state = RequestState::Loaded(symbol.clone());
                Settlement::Rendered {
                    symbol,
                    panels: ids,
                }
            }
            Err(e) => {
                warn!(symbol = %symbol, kind = ?e.kind(), "load failed: {e}");
                let message = e.user_message();
                self.view.show_error(&message);
                self.state = RequestState::Failed(symbol.clone(), message.clone());
                Settlement::Failed { symbol, message }
            }
        };

        self.view.set_loading_visible(false);
        settlement
    }

    /// Runs one request start to finish: begin, fetch, settle.
    ///
    /// Returns `None` when the input was blank.
    pub async fn load(&mut self, raw: &str) -> Option<Settlement> {
        let ticket = self.begin(raw)?;
        let outcome = self.provider.fetch(ticket.symbol()).await;
        Some(self.settle(ticket, outcome))
    }
}
