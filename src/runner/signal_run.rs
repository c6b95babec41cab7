use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::switch_config::SwitchConfig;
use crate::market::errors::FetchError;
use crate::market::quote_fetcher::QuoteFetcher;
use crate::market::quote_source::QuoteSource;
use crate::notify::Notifier;
use crate::notify::errors::NotifyError;
use crate::scheduling::types::{GuardDecision, SkipReason};
use crate::signal::evaluator::SignalEvaluator;
use crate::signal::message::{failure_message, signal_message};
use crate::types::decision::Decision;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Skipped(SkipReason),
    Notified(Decision),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not fetch quotes")]
    Fetch {
        #[source]
        source: FetchError,
        failure_notified: bool,
    },

    #[error("decision {} computed but notification failed", .decision.action)]
    Notify {
        decision: Decision,
        #[source]
        source: NotifyError,
    },
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Fetch { .. } => 2,
            Self::Notify { .. } => 3,
        }
    }
}

/// One invocation: guard, fetch both quotes, evaluate, notify.
pub struct SignalRun<'a> {
    config: &'a SwitchConfig,
    source: &'a dyn QuoteSource,
    notifier: &'a dyn Notifier,
}

impl<'a> SignalRun<'a> {
    pub fn new(
        config: &'a SwitchConfig,
        source: &'a dyn QuoteSource,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
        }
    }

    pub async fn execute(&self, now: DateTime<Utc>) -> Result<RunOutcome, RunError> {
        if let GuardDecision::Skip(reason) = self.config.guard.check(now) {
            info!(?reason, "outside guard window, skipping run");
            return Ok(RunOutcome::Skipped(reason));
        }

        let config = self.config;
        let local_now = now.with_timezone(&config.timezone());
        let session = local_now.date_naive();
        let pair = &config.pair;

        info!(
            %session,
            ticker_a = %pair.ticker_a,
            ticker_b = %pair.ticker_b,
            holding = %config.holding,
            source = self.source.name(),
            max_open_wait = ?config.open_retry.worst_case_wait(),
            "starting signal run"
        );

        let fetcher = QuoteFetcher::new(self.source, config.open_retry);
        let quotes = match fetcher.fetch(&pair.ticker_a, session).await {
            Ok(quote_a) => fetcher
                .fetch(&pair.ticker_b, session)
                .await
                .map(|quote_b| (quote_a, quote_b)),
            Err(error) => Err(error),
        };

        let (quote_a, quote_b) = match quotes {
            Ok(quotes) => quotes,
            Err(fetch_error) => {
                error!(ticker = fetch_error.ticker(), error = %fetch_error, "quote fetch failed");

                let failure_notified = config.notify_on_failure
                    && self.notify_failure(&failure_message(local_now, &fetch_error)).await;

                return Err(RunError::Fetch {
                    source: fetch_error,
                    failure_notified,
                });
            }
        };

        let evaluator = SignalEvaluator::new(pair.clone(), config.delta_bps);
        let decision = evaluator.evaluate(&quote_a, &quote_b, config.holding);
        info!(rationale = %decision.rationale, "decision");

        let message = signal_message(
            local_now,
            pair,
            (&quote_a, &quote_b),
            config.holding,
            evaluator.delta_bps(),
            &decision,
        );
        println!("{message}");

        match self.notifier.send(&message).await {
            Ok(()) => Ok(RunOutcome::Notified(decision)),
            Err(source) => Err(RunError::Notify { decision, source }),
        }
    }

    async fn notify_failure(&self, message: &str) -> bool {
        match self.notifier.send(message).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    %error,
                    notifier = self.notifier.name(),
                    "failure notification not delivered"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::switch_config::test_args;
    use crate::market::fake_source::FakeQuoteSource;
    use crate::notify::fake_notifier::FakeNotifier;
    use crate::types::decision::Action;
    use chrono::TimeZone;
    use chrono_tz::America::Toronto;

    fn config(extra: &[&str]) -> SwitchConfig {
        let mut argv = vec![
            "--notifier", "dry-run",
            "--a", "VFV.TO",
            "--b", "SU.TO",
            "--label-a", "VFV",
            "--label-b", "SU",
            "--retries", "3",
            "--delay", "0",
            "--guard-start", "09:40",
            "--guard-end", "09:50",
        ];
        argv.extend_from_slice(extra);
        SwitchConfig::from_args(test_args(&argv).unwrap()).unwrap()
    }

    fn scenario_source() -> FakeQuoteSource {
        FakeQuoteSource::new()
            .with_ticker("VFV.TO", Some(100.0), Some(100.3))
            .with_ticker("SU.TO", Some(50.0), Some(50.5))
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Toronto
            .with_ymd_and_hms(2025, 9, 2, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn switch_signal_is_notified() {
        let config = config(&["--delta-bps", "7"]);
        let source = scenario_source();
        let notifier = FakeNotifier::new();

        let outcome = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 45))
            .await
            .unwrap();

        let RunOutcome::Notified(decision) = outcome else {
            panic!("expected a notified decision");
        };
        assert_eq!(decision.action, Action::SwitchToB);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("**Action**: Switch to **SU** (Sell VFV @ open; Buy SU)"));
    }

    #[tokio::test]
    async fn wide_threshold_holds() {
        let config = config(&["--delta-bps", "100"]);
        let source = scenario_source();
        let notifier = FakeNotifier::new();

        let outcome = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 45))
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Notified(ref d) if d.action == Action::Hold));
        assert!(notifier.sent()[0].contains("Hold **VFV**"));
    }

    #[tokio::test]
    async fn guard_skips_without_fetching_or_notifying() {
        let config = config(&["--guard"]);
        let source = scenario_source();
        let notifier = FakeNotifier::new();

        let outcome = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 39))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Skipped(SkipReason::OutsideWindow { .. })
        ));
        assert_eq!(source.open_calls("VFV.TO"), 0);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn guard_inside_window_proceeds() {
        let config = config(&["--guard"]);
        let source = scenario_source();
        let notifier = FakeNotifier::new();

        let outcome = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 40))
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Notified(_)));
    }

    #[tokio::test]
    async fn exhausted_open_notifies_degraded_message() {
        let config = config(&[]);
        let source = scenario_source().open_unpublished_for("SU.TO", 3);
        let notifier = FakeNotifier::new();

        let error = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 45))
            .await
            .unwrap_err();

        assert_eq!(error.exit_code(), 2);
        assert!(matches!(
            error,
            RunError::Fetch {
                source: FetchError::RetryBudgetExhausted { attempts: 3, .. },
                failure_notified: true,
            }
        ));
        assert_eq!(source.open_calls("SU.TO"), 3);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Could not fetch data"));
        assert!(!sent[0].contains("**Action**"));
    }

    #[tokio::test]
    async fn failure_notification_can_be_disabled() {
        let config = config(&["--notify-on-failure", "0"]);
        let source = FakeQuoteSource::new().with_ticker("SU.TO", Some(50.0), Some(50.5));
        let notifier = FakeNotifier::new();

        let error = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 45))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            RunError::Fetch {
                source: FetchError::DataIntegrity { .. },
                failure_notified: false,
            }
        ));
        assert!(notifier.sent().is_empty());
        assert_eq!(source.open_calls("SU.TO"), 0);
    }

    #[tokio::test]
    async fn notification_failure_keeps_the_decision() {
        let config = config(&[]);
        let source = scenario_source();
        let notifier = FakeNotifier::failing();

        let error = SignalRun::new(&config, &source, &notifier)
            .execute(at(9, 45))
            .await
            .unwrap_err();

        assert_eq!(error.exit_code(), 3);
        match error {
            RunError::Notify { decision, .. } => assert_eq!(decision.action, Action::SwitchToB),
            other => panic!("expected notify error, got {other:?}"),
        }
    }
}
