pub mod discord_webhook;
pub mod dry_run;
pub mod errors;
#[cfg(test)]
pub mod fake_notifier;

use async_trait::async_trait;

use crate::notify::errors::NotifyError;

/// Sink for the run's single text payload.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, content: &str) -> Result<(), NotifyError>;
}
