use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use url::Url;

use crate::market::errors::QuoteError;
use crate::market::quote_source::QuoteSource;
use crate::yahoo::yahoo_chart::{ChartResponse, SessionBar, first_open_on, last_close_before};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Quote source backed by Yahoo's public chart API.
#[derive(Debug, Clone)]
pub struct YahooQuoteSource {
    http: reqwest::Client,
    base_url: Url,
}

impl YahooQuoteSource {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            bail!("quote base url cannot be a base: {base_url}");
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build quote http client")?;

        Ok(Self { http, base_url })
    }

    fn chart_url(&self, ticker: &str, range: &str, interval: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", interval);
        url
    }

    async fn bars(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<Vec<SessionBar>, QuoteError> {
        let url = self.chart_url(ticker, range, interval);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| QuoteError::Network(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| QuoteError::Network(error.to_string()))?;

        debug!(%ticker, %status, range, interval, "chart request");

        /* unknown symbols come back as 404 with a chart error body */
        match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) => chart.into_bars(ticker),
            Err(_) if !status.is_success() => Err(QuoteError::Http {
                status: status.as_u16(),
                body: text,
            }),
            Err(error) => Err(QuoteError::ResponseFormat(error.to_string())),
        }
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn prior_close(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError> {
        let bars = self.bars(ticker, "5d", "1d").await?;

        Ok(last_close_before(&bars, session))
    }

    async fn today_open(
        &self,
        ticker: &str,
        session: NaiveDate,
    ) -> Result<Option<f64>, QuoteError> {
        let bars = self.bars(ticker, "1d", "1m").await?;

        Ok(first_open_on(&bars, session))
    }
}
