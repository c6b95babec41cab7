use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::notify::Notifier;
use crate::notify::errors::NotifyError;
use crate::retry::{Attempt, RetryError, RetryPolicy, retry};

/// Discord rejects message content longer than this.
const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http: reqwest::Client,
    url: Url,
    policy: RetryPolicy,
}

impl DiscordWebhook {
    pub fn new(url: Url, timeout: Duration, policy: RetryPolicy) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, url, policy })
    }

    async fn post_once(&self, content: &str) -> Attempt<(), NotifyError> {
        let payload = json!({ "content": content });

        let response = match self.http.post(self.url.clone()).json(&payload).send().await {
            Ok(response) => response,
            Err(error) => return Attempt::Pending(format!("webhook request failed: {error}")),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Ready(());
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, %body, "webhook error response");

        classify_status(status, body)
    }
}

/// 429 and 5xx are worth another try; any other failure status is final.
fn classify_status(status: StatusCode, body: String) -> Attempt<(), NotifyError> {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Attempt::Pending(format!("http {status}"));
    }

    Attempt::Failed(NotifyError::Rejected {
        status: status.as_u16(),
        body,
    })
}

fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((index, _)) => &content[..index],
        None => content,
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send(&self, content: &str) -> Result<(), NotifyError> {
        let content = truncate_content(content);

        retry(self.policy, "discord webhook", move |_| self.post_once(content))
            .await
            .map_err(|error| match error {
                RetryError::Failed(error) => error,
                RetryError::Exhausted {
                    attempts,
                    last_reason,
                } => NotifyError::RetryBudgetExhausted {
                    attempts,
                    last_reason,
                },
            })?;

        info!("notification delivered");

        Ok(())
    }
}
