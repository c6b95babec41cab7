use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook rejected the message: http {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("notification not delivered after {attempts} attempts ({last_reason})")]
    RetryBudgetExhausted { attempts: u32, last_reason: String },
}
