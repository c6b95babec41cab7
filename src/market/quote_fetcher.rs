use chrono::NaiveDate;
use tracing::{debug, info};

use crate::market::errors::{FetchError, QuoteError};
use crate::market::quote_source::QuoteSource;
use crate::retry::{Attempt, RetryError, RetryPolicy, retry};
use crate::types::price::Price;
use crate::types::quote::Quote;

/// Obtains a complete [`Quote`] for a ticker, waiting out a late open.
pub struct QuoteFetcher<'a> {
    source: &'a dyn QuoteSource,
    open_policy: RetryPolicy,
}

impl<'a> QuoteFetcher<'a> {
    pub fn new(source: &'a dyn QuoteSource, open_policy: RetryPolicy) -> Self {
        Self {
            source,
            open_policy,
        }
    }

    pub async fn fetch(&self, ticker: &str, session: NaiveDate) -> Result<Quote, FetchError> {
        let prior_close = self.fetch_prior_close(ticker, session).await?;
        let today_open = self.fetch_today_open(ticker, session).await?;

        info!(
            %ticker,
            source = self.source.name(),
            %prior_close,
            %today_open,
            "quote fetched"
        );

        Ok(Quote::new(ticker, prior_close, today_open))
    }

    /// A missing close is an integrity problem, not a timing lag, so it is
    /// never retried.
    async fn fetch_prior_close(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Price, FetchError> {
        let close = self
            .source
            .prior_close(ticker, session)
            .await
            .map_err(|error| classify_permanent(ticker, error))?;

        match close {
            Some(value) => Price::new(value).ok_or_else(|| FetchError::DataIntegrity {
                ticker: ticker.to_string(),
                reason: format!("prior close is not positive: {value}"),
            }),
            None => Err(FetchError::DataIntegrity {
                ticker: ticker.to_string(),
                reason: "no prior session close".to_string(),
            }),
        }
    }

    async fn fetch_today_open(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Price, FetchError> {
        let source = self.source;

        let result = retry(self.open_policy, ticker, move |attempt| async move {
            debug!(%ticker, attempt, "requesting session open");

            match source.today_open(ticker, session).await {
                Ok(Some(value)) => match Price::new(value) {
                    Some(price) => Attempt::Ready(price),
                    None => Attempt::Pending(format!("open is not positive: {value}")),
                },
                Ok(None) => Attempt::Pending("open not published yet".to_string()),
                Err(error @ QuoteError::InvalidTicker { .. }) => {
                    Attempt::Failed(classify_permanent(ticker, error))
                }
                Err(error) => Attempt::Pending(error.to_string()),
            }
        })
        .await;

        result.map_err(|error| match error {
            RetryError::Failed(error) => error,
            RetryError::Exhausted {
                attempts,
                last_reason,
            } => FetchError::RetryBudgetExhausted {
                ticker: ticker.to_string(),
                attempts,
                last_reason,
            },
        })
    }
}

fn classify_permanent(ticker: &str, error: QuoteError) -> FetchError {
    match error {
        QuoteError::InvalidTicker { .. } => FetchError::DataIntegrity {
            ticker: ticker.to_string(),
            reason: error.to_string(),
        },
        other => FetchError::Source {
            ticker: ticker.to_string(),
            source: other,
        },
    }
}
