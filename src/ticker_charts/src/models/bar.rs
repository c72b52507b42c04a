//! Canonical in-memory representation of a daily trading bar (OHLCV).
//!
//! Bars arrive from the data provider in chronological order and are consumed
//! as-is by the chart assembler; [`validate_series`] checks the invariants the
//! assembler relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single trading-period bar.
///
/// Serialized with the provider's field names, dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date of this bar.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the period.
    pub high: f64,

    /// Lowest price during the period.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the period.
    pub volume: u64,
}

/// Violations of the bar sequence invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BarError {
    #[error("bar {date} has a non-positive or non-finite price")]
    InvalidPrice { date: NaiveDate },

    #[error("bar {date} violates low <= open/close <= high")]
    InconsistentRange { date: NaiveDate },

    #[error("bar {date} does not come after {previous}")]
    OutOfOrder { previous: NaiveDate, date: NaiveDate },
}

impl Bar {
    /// Checks `low <= min(open, close) <= max(open, close) <= high` and that
    /// every price is a positive finite number.
    pub fn check(&self) -> Result<(), BarError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(BarError::InvalidPrice { date: self.date });
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low || body_high > self.high {
            return Err(BarError::InconsistentRange { date: self.date });
        }
        Ok(())
    }

    /// The x-axis label for this bar.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Validates each bar and that dates are strictly increasing (chronological,
/// no duplicates).
pub fn validate_series(bars: &[Bar]) -> Result<(), BarError> {
    for bar in bars {
        bar.check()?;
    }
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(BarError::OutOfOrder {
                previous: pair[0].date,
                date: pair[1].date,
            });
        }
    }
    Ok(())
}
