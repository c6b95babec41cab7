use async_trait::async_trait;
use tracing::info;

use crate::notify::Notifier;
use crate::notify::errors::NotifyError;

/// Logs the payload instead of posting it anywhere.
#[derive(Debug, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn send(&self, content: &str) -> Result<(), NotifyError> {
        info!(chars = content.chars().count(), "dry run, notification not sent");

        Ok(())
    }
}
