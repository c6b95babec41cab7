use async_trait::async_trait;
use chrono::NaiveDate;

use crate::market::errors::QuoteError;

/// Remote provider of session prices.
///
/// `Ok(None)` means the price is not published yet, which callers must be
/// able to tell apart from [`QuoteError::InvalidTicker`].
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn name(&self) -> &str;

    /// Close of the last session strictly before `session`.
    async fn prior_close(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError>;

    /// Opening price of `session`.
    async fn today_open(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError>;
}
