use thiserror::Error;

/// Errors reported by a quote source for a single request.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("unknown ticker: {ticker}")]
    InvalidTicker { ticker: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    ResponseFormat(String),
}

/// Terminal outcome of fetching one ticker's quote.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("data integrity error for {ticker}: {reason}")]
    DataIntegrity { ticker: String, reason: String },

    #[error("open for {ticker} still unavailable after {attempts} attempts ({last_reason})")]
    RetryBudgetExhausted {
        ticker: String,
        attempts: u32,
        last_reason: String,
    },

    #[error("quote source failed for {ticker}: {source}")]
    Source {
        ticker: String,
        #[source]
        source: QuoteError,
    },
}

impl FetchError {
    pub fn ticker(&self) -> &str {
        match self {
            Self::DataIntegrity { ticker, .. }
            | Self::RetryBudgetExhausted { ticker, .. }
            | Self::Source { ticker, .. } => ticker,
        }
    }
}
