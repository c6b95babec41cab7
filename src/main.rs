mod config;
mod market;
mod notify;
mod retry;
mod runner;
mod scenario;
mod scheduling;
mod signal;
#[cfg(test)]
mod stub_server;
mod types;
mod yahoo;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::switch_config::{SwitchArgs, SwitchConfig};
use crate::runner::signal_run::{RunOutcome, SignalRun};
use crate::scenario::scenario::Scenario;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "switch_signal=info"
                    .parse()
                    .context("invalid default log directive")?,
            ),
        )
        .with_target(false)
        .init();

    let config = SwitchConfig::from_args(SwitchArgs::parse()).context("invalid configuration")?;

    let source = Scenario::quote_source(&config)?;
    let notifier = Scenario::notifier(&config)?;

    let run = SignalRun::new(&config, source.as_ref(), notifier.as_ref());

    match run.execute(Utc::now()).await {
        Ok(RunOutcome::Skipped(_)) => Ok(ExitCode::SUCCESS),
        Ok(RunOutcome::Notified(decision)) => {
            info!(action = %decision.action, edge_bps = decision.edge_bps, "run complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(run_error) => {
            let code = run_error.exit_code();
            error!(error = ?anyhow::Error::from(run_error), "run failed");
            Ok(ExitCode::from(code))
        }
    }
}
