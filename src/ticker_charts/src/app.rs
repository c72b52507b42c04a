//! The page's event loop.
//!
//! UI events arrive on an `mpsc` channel. Each request's fetch runs as its own
//! task and posts its outcome back into the loop, so overlapping requests may
//! finish in any order; the controller's tickets decide which outcome is
//! still wanted.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{payload::ProviderPayload, symbol::Symbol};
use crate::providers::errors::ProviderError;
use crate::view::{Settlement, Ticket, View, ViewController};

/// User interactions with the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The ticker text box now holds this text.
    InputChanged(String),
    /// A key was pressed inside the ticker text box.
    KeyPress(String),
    SubmitClicked,
    /// Quick-select button at this (0-based) index was clicked.
    QuickTicker(usize),
    /// Closes the page; outstanding responses are dropped.
    Quit,
}

impl UiEvent {
    /// Translates one line of terminal input.
    ///
    /// `:q` quits, `:submit` clicks submit, `:N` clicks quick button N
    /// (1-based), anything else is typed into the ticker box followed by Enter.
    /// Malformed `:` commands yield nothing.
    pub fn from_command_line(line: &str) -> Vec<UiEvent> {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.trim().strip_prefix(':') {
            Some("q") => vec![UiEvent::Quit],
            Some("submit") => vec![UiEvent::SubmitClicked],
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => vec![UiEvent::QuickTicker(n - 1)],
                _ => Vec::new(),
            },
            None => vec![
                UiEvent::InputChanged(line.to_string()),
                UiEvent::KeyPress("Enter".to_string()),
            ],
        }
    }
}

type Outcome = (Ticket, Result<ProviderPayload, ProviderError>);

/// Owns the controller and the ticker text box contents.
pub struct App<V> {
    controller: ViewController<V>,
    input: String,
    default_symbol: Symbol,
    settled_tx: mpsc::UnboundedSender<Outcome>,
    settled_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<V: View> App<V> {
    pub fn new(controller: ViewController<V>, default_symbol: Symbol) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            input: String::new(),
            default_symbol,
            settled_tx,
            settled_rx,
        }
    }

    pub fn controller(&self) -> &ViewController<V> {
        &self.controller
    }

    /// Activates the page with the default symbol, then handles events until
    /// `Quit`, or until the event channel closes and no request is pending.
    ///
    /// `on_change` sees the controller after every visible change: a request
    /// starting and a current request settling. Its errors end the loop.
    pub async fn run<F>(
        mut self,
        mut events: mpsc::Receiver<UiEvent>,
        mut on_change: F,
    ) -> anyhow::Result<ViewController<V>>
    where
        F: FnMut(&ViewController<V>) -> anyhow::Result<()>,
    {
        let initial = self.default_symbol.to_string();
        if self.start(&initial) {
            on_change(&self.controller)?;
        }

        let mut ui_open = true;
        loop {
            if !ui_open && !self.controller.is_pending() {
                break;
            }

            tokio::select! {
                event = events.recv(), if ui_open => match event {
                    Some(UiEvent::Quit) => {
                        info!("quit requested");
                        break;
                    }
                    Some(event) => {
                        if self.handle(event) {
                            on_change(&self.controller)?;
                        }
                    }
                    None => {
                        debug!("event channel closed; draining pending request");
                        ui_open = false;
                    }
                },
                Some((ticket, outcome)) = self.settled_rx.recv() => {
                    match self.controller.settle(ticket, outcome) {
                        Settlement::Superseded { .. } => {}
                        _ => on_change(&self.controller)?,
                    }
                }
            }
        }

        Ok(self.controller)
    }

    /// Returns whether a request was started.
    fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::InputChanged(text) => {
                self.controller.set_input(&text);
                self.input = text;
                false
            }
            UiEvent::KeyPress(key) if key == "Enter" => self.submit(),
            UiEvent::KeyPress(_) => false,
            UiEvent::SubmitClicked => self.submit(),
            UiEvent::QuickTicker(index) => match self.controller.press_quick_ticker(index) {
                Some(ticket) => {
                    self.dispatch(ticket);
                    true
                }
                None => false,
            },
            UiEvent::Quit => false,
        }
    }

    fn submit(&mut self) -> bool {
        let input = self.input.clone();
        self.start(&input)
    }

    fn start(&mut self, raw: &str) -> bool {
        match self.controller.begin(raw) {
            Some(ticket) => {
                self.dispatch(ticket);
                true
            }
            None => false,
        }
    }

    fn dispatch(&self, ticket: Ticket) {
        let provider = self.controller.provider();
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = provider.fetch(ticket.symbol()).await;
            // The loop may already have quit; nothing left to update then.
            let _ = tx.send((ticket, outcome));
        });
    }
}
