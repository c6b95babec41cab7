use std::sync::Mutex;

use async_trait::async_trait;

use crate::notify::Notifier;
use crate::notify::errors::NotifyError;

/// Records every payload; optionally refuses delivery.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<String>>,
    failing: bool,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, content: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(content.to_string());

        if self.failing {
            return Err(NotifyError::RetryBudgetExhausted {
                attempts: 3,
                last_reason: "http 503".to_string(),
            });
        }

        Ok(())
    }
}
