//! Yahoo Finance v8 chart response model and session-bar extraction.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::market::errors::QuoteError;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    /// Exchange offset from UTC in seconds at the time of the request.
    #[serde(default)]
    gmtoffset: i64,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// One bar, dated in the exchange's local calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

impl ChartResponse {
    /// Flattens the response into bars in timestamp order.
    ///
    /// A response with no bars yet (early in the session) is an empty list,
    /// while an unknown symbol is [`QuoteError::InvalidTicker`].
    pub fn into_bars(self, ticker: &str) -> Result<Vec<SessionBar>, QuoteError> {
        if let Some(error) = self.chart.error {
            if error.code == "Not Found" {
                return Err(QuoteError::InvalidTicker {
                    ticker: ticker.to_string(),
                });
            }
            return Err(QuoteError::ResponseFormat(format!(
                "{}: {}",
                error.code, error.description
            )));
        }

        let data = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| QuoteError::InvalidTicker {
                ticker: ticker.to_string(),
            })?;

        tracing::debug!(
            %ticker,
            gmtoffset = data.meta.gmtoffset,
            timezone = data.meta.exchange_timezone_name.as_deref().unwrap_or("unknown"),
            bars = data.timestamp.len(),
            "chart response"
        );

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = data.meta.gmtoffset;

        data.timestamp
            .iter()
            .enumerate()
            .map(|(index, &timestamp)| {
                let date = DateTime::from_timestamp(timestamp + offset, 0)
                    .map(|shifted| shifted.naive_utc().date())
                    .ok_or_else(|| {
                        QuoteError::ResponseFormat(format!("invalid timestamp: {timestamp}"))
                    })?;

                Ok(SessionBar {
                    date,
                    open: quote.open.get(index).copied().flatten(),
                    close: quote.close.get(index).copied().flatten(),
                })
            })
            .collect()
    }
}

/// Close of the latest bar dated strictly before `session`.
pub fn last_close_before(bars: &[SessionBar], session: NaiveDate) -> Option<f64> {
    bars.iter()
        .rev()
        .filter(|bar| bar.date < session)
        .find_map(|bar| bar.close)
}

/// Open of the earliest bar dated `session`.
pub fn first_open_on(bars: &[SessionBar], session: NaiveDate) -> Option<f64> {
    bars.iter()
        .filter(|bar| bar.date == session)
        .find_map(|bar| bar.open)
}
