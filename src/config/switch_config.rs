use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use chrono_tz::Tz;
use clap::{ArgAction, Parser};
use url::Url;

use crate::config::env_bool::parse_env_bool;
use crate::retry::RetryPolicy;
use crate::scenario::notifiers::NotifierKind;
use crate::scheduling::time_guard::{GuardWindow, TimeGuard};
use crate::types::asset_pair::AssetPair;
use crate::types::holding::Holding;
use crate::yahoo::yahoo_source::DEFAULT_BASE_URL;

/// Command line flags. Each falls back to its environment variable, then to
/// the default.
#[derive(Debug, Clone, Parser)]
#[command(about = "Binary switch signal with Discord webhook", args_override_self = true)]
pub struct SwitchArgs {
    #[arg(long = "a", env = "TICKER_A", default_value = "VFV.TO")]
    pub ticker_a: String,

    #[arg(long = "b", env = "TICKER_B", default_value = "VEQT.TO")]
    pub ticker_b: String,

    #[arg(long, env = "LABEL_A", default_value = "A")]
    pub label_a: String,

    #[arg(long, env = "LABEL_B", default_value = "B")]
    pub label_b: String,

    /// Asset currently held; only a stronger other asset triggers a switch.
    #[arg(long, env = "CURRENT_HOLDING", value_enum, ignore_case = true, default_value = "A")]
    pub holding: Holding,

    /// Hysteresis threshold in basis points.
    #[arg(long, env = "DELTA_BPS", default_value_t = 7.0)]
    pub delta_bps: f64,

    /// Only act inside the guard window.
    #[arg(
        long = "guard",
        env = "TIME_GUARD",
        value_parser = parse_env_bool,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "0",
        default_missing_value = "1"
    )]
    pub time_guard: bool,

    #[arg(long, env = "GUARD_START", value_parser = parse_time, default_value = "09:31")]
    pub guard_start: NaiveTime,

    #[arg(long, env = "GUARD_END", value_parser = parse_time, default_value = "09:41")]
    pub guard_end: NaiveTime,

    #[arg(
        long,
        env = "GUARD_WEEKEND_PAUSE",
        value_parser = parse_env_bool,
        action = ArgAction::Set,
        default_value = "0"
    )]
    pub guard_weekend_pause: bool,

    #[arg(
        long,
        env = "EXCHANGE_TZ",
        value_parser = parse_timezone,
        default_value = "America/Toronto"
    )]
    pub exchange_tz: Tz,

    /// Attempts at fetching today's open.
    #[arg(long = "retries", env = "OPEN_RETRIES", default_value_t = 8)]
    pub open_retries: u32,

    /// Seconds between open fetch attempts.
    #[arg(long = "delay", env = "OPEN_RETRY_DELAY", default_value_t = 10.0)]
    pub open_retry_delay: f64,

    /// Per-request timeout in seconds.
    #[arg(long, env = "HTTP_TIMEOUT", default_value_t = 20.0)]
    pub http_timeout: f64,

    #[arg(long, env = "NOTIFY_RETRIES", default_value_t = 3)]
    pub notify_retries: u32,

    #[arg(long, env = "NOTIFY_RETRY_DELAY", default_value_t = 2.0)]
    pub notify_retry_delay: f64,

    /// Post a degraded message when quotes cannot be fetched.
    #[arg(
        long,
        env = "NOTIFY_ON_FAILURE",
        value_parser = parse_env_bool,
        action = ArgAction::Set,
        default_value = "1"
    )]
    pub notify_on_failure: bool,

    #[arg(long, env = "NOTIFIER", value_enum, default_value = "discord")]
    pub notifier: NotifierKind,

    #[arg(long = "webhook", env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    #[arg(long, env = "QUOTE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub quote_base_url: String,
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|error| format!("invalid time {value:?} (expected HH:MM[:SS]): {error}"))
}

fn parse_timezone(value: &str) -> Result<Tz, String> {
    value.trim().parse::<Tz>().map_err(|error| error.to_string())
}

/// Validated, immutable run configuration.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    pub pair: AssetPair,
    pub holding: Holding,
    pub delta_bps: f64,
    pub guard: TimeGuard,
    pub open_retry: RetryPolicy,
    pub notify_retry: RetryPolicy,
    pub notify_on_failure: bool,
    pub http_timeout: Duration,
    pub notifier: NotifierKind,
    pub webhook_url: Option<Url>,
    pub quote_base_url: Url,
}

impl SwitchConfig {
    pub fn from_args(args: SwitchArgs) -> Result<Self> {
        let ticker_a = non_empty("TICKER_A", &args.ticker_a)?;
        let ticker_b = non_empty("TICKER_B", &args.ticker_b)?;
        if ticker_a == ticker_b {
            bail!("TICKER_A and TICKER_B must differ (both {ticker_a})");
        }

        if !args.delta_bps.is_finite() || args.delta_bps < 0.0 {
            bail!("DELTA_BPS must be a non-negative number, got {}", args.delta_bps);
        }

        if args.guard_start == args.guard_end {
            bail!("guard window is empty: GUARD_START equals GUARD_END");
        }

        let open_retry = RetryPolicy::new(
            args.open_retries,
            seconds("OPEN_RETRY_DELAY", args.open_retry_delay)?,
        );
        let notify_retry = RetryPolicy::new(
            args.notify_retries,
            seconds("NOTIFY_RETRY_DELAY", args.notify_retry_delay)?,
        );
        let http_timeout = seconds("HTTP_TIMEOUT", args.http_timeout)?;
        if http_timeout.is_zero() {
            bail!("HTTP_TIMEOUT must be greater than zero");
        }

        let webhook_url = args
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| http_url("DISCORD_WEBHOOK_URL", raw))
            .transpose()?;

        if args.notifier == NotifierKind::Discord && webhook_url.is_none() {
            bail!("DISCORD_WEBHOOK_URL not set (or --webhook not provided)");
        }

        let quote_base_url = http_url("QUOTE_BASE_URL", &args.quote_base_url)?;

        Ok(Self {
            pair: AssetPair::new(
                ticker_a,
                ticker_b,
                args.label_a.trim(),
                args.label_b.trim(),
            ),
            holding: args.holding,
            delta_bps: args.delta_bps,
            guard: TimeGuard::new(
                args.time_guard,
                GuardWindow::new(args.guard_start, args.guard_end),
                args.exchange_tz,
                args.guard_weekend_pause,
            ),
            open_retry,
            notify_retry,
            notify_on_failure: args.notify_on_failure,
            http_timeout,
            notifier: args.notifier,
            webhook_url,
            quote_base_url,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.guard.timezone
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{key} must not be empty");
    }
    Ok(value.to_string())
}

fn seconds(key: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{key} must be a non-negative number of seconds, got {value}"))
}

fn http_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("{key} is not a valid url"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => bail!("{key} must be an http(s) url, got scheme {scheme}"),
    }
}

#[cfg(test)]
const TEST_WEBHOOK: &str = "https://discord.com/api/webhooks/1/token";

/// Every env-backed flag set explicitly, so tests never read the process
/// environment.
#[cfg(test)]
const TEST_ARGV: &[&str] = &[
    "switch-signal",
    "--a", "VFV.TO",
    "--b", "VEQT.TO",
    "--label-a", "A",
    "--label-b", "B",
    "--holding", "A",
    "--delta-bps", "7",
    "--guard", "0",
    "--guard-start", "09:31",
    "--guard-end", "09:41",
    "--guard-weekend-pause", "0",
    "--exchange-tz", "America/Toronto",
    "--retries", "8",
    "--delay", "10",
    "--http-timeout", "20",
    "--notify-retries", "3",
    "--notify-retry-delay", "2",
    "--notify-on-failure", "1",
    "--notifier", "discord",
    "--webhook", TEST_WEBHOOK,
    "--quote-base-url", DEFAULT_BASE_URL,
];

/// Parses [`TEST_ARGV`] followed by `extra`; later flags win.
#[cfg(test)]
pub(crate) fn test_args(extra: &[&str]) -> Result<SwitchArgs, clap::Error> {
    let argv = TEST_ARGV.iter().chain(extra).copied();
    SwitchArgs::try_parse_from(argv)
}
