use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::market::errors::QuoteError;
use crate::market::quote_source::QuoteSource;

#[derive(Debug, Clone, Copy)]
struct FakeTicker {
    close: Option<f64>,
    open: Option<f64>,
    unpublished_calls: u32,
}

/// In-memory quote source for tests. Unknown tickers are reported as invalid.
#[derive(Debug, Default)]
pub struct FakeQuoteSource {
    tickers: HashMap<String, FakeTicker>,
    open_calls: Mutex<HashMap<String, u32>>,
}

impl FakeQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: &str, close: Option<f64>, open: Option<f64>) -> Self {
        self.tickers.insert(
            ticker.to_string(),
            FakeTicker {
                close,
                open,
                unpublished_calls: 0,
            },
        );
        self
    }

    /// Report the open as unpublished for the first `calls` requests.
    pub fn open_unpublished_for(mut self, ticker: &str, calls: u32) -> Self {
        if let Some(entry) = self.tickers.get_mut(ticker) {
            entry.unpublished_calls = calls;
        }
        self
    }

    pub fn open_calls(&self, ticker: &str) -> u32 {
        self.open_calls
            .lock()
            .unwrap()
            .get(ticker)
            .copied()
            .unwrap_or(0)
    }

    fn lookup(&self, ticker: &str) -> Result<FakeTicker, QuoteError> {
        self.tickers
            .get(ticker)
            .copied()
            .ok_or_else(|| QuoteError::InvalidTicker {
                ticker: ticker.to_string(),
            })
    }
}

#[async_trait]
impl QuoteSource for FakeQuoteSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn prior_close(
        &self,
        ticker: &str,
        _session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError> {
        Ok(self.lookup(ticker)?.close)
    }

    async fn today_open(
        &self,
        ticker: &str,
        _session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError> {
        let entry = self.lookup(ticker)?;

        let call = {
            let mut calls = self.open_calls.lock().unwrap();
            let count = calls.entry(ticker.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if call <= entry.unpublished_calls {
            return Ok(None);
        }

        Ok(entry.open)
    }
}
