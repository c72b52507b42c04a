use crate::models::symbol::{Symbol, SymbolError};

/// The quick-select ticker buttons. At most one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickTickers {
    symbols: Vec<Symbol>,
    active: Option<usize>,
}

impl QuickTickers {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            active: None,
        }
    }

    /// Normalizes each configured ticker; any blank entry is an error.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, SymbolError> {
        let symbols = raw
            .iter()
            .map(|s| Symbol::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(symbols))
    }

    /// Presses button `index`: it becomes the only active one and its symbol
    /// is returned. Out-of-range presses change nothing.
    pub fn press(&mut self, index: usize) -> Option<Symbol> {
        let symbol = self.symbols.get(index)?.clone();
        self.active = Some(index);
        Some(symbol)
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
