//! Ticker symbol normalization.
//!
//! Every symbol that reaches a provider, a chart title or a request state goes
//! through [`Symbol::parse`] first, so the rest of the crate can assume a
//! trimmed, uppercased, non-empty ticker.

use std::fmt;

use thiserror::Error;

/// Errors from normalizing user-entered ticker text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// Nothing was left after trimming whitespace.
    #[error("ticker symbol cannot be empty")]
    EmptyInput,
}

/// A normalized ticker symbol (e.g. `"AAPL"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Trims surrounding whitespace and uppercases the input.
    ///
    /// Returns [`SymbolError::EmptyInput`] when the result is empty; callers
    /// must not issue a request in that case.
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(SymbolError::EmptyInput);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
