use crate::types::price::Price;

/// Prior session close and current session open for one ticker.
///
/// Only constructed once both prices are known, so a `Quote` is always
/// complete enough to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker: String,
    pub prior_close: Price,
    pub today_open: Price,
}

impl Quote {
    pub fn new(ticker: impl Into<String>, prior_close: Price, today_open: Price) -> Self {
        Self {
            ticker: ticker.into(),
            prior_close,
            today_open,
        }
    }

    /// Relative change from the prior close to today's open.
    pub fn overnight_return(&self) -> f64 {
        (self.today_open - self.prior_close) / self.prior_close.as_f64()
    }
}
