use anyhow::{Context, Result};

use crate::{
    config::switch_config::SwitchConfig,
    market::quote_source::QuoteSource,
    notify::{Notifier, discord_webhook::DiscordWebhook, dry_run::DryRunNotifier},
    scenario::notifiers::NotifierKind,
    yahoo::yahoo_source::YahooQuoteSource,
};

pub struct Scenario;

type DynamicNotifier = Box<dyn Notifier>;
type DynamicQuoteSource = Box<dyn QuoteSource>;

impl Scenario {
    pub fn quote_source(config: &SwitchConfig) -> Result<DynamicQuoteSource> {
        tracing::info!(base_url = %config.quote_base_url, "creating quote source");

        let source = YahooQuoteSource::new(config.quote_base_url.clone(), config.http_timeout)?;

        Ok(Box::new(source))
    }

    pub fn notifier(config: &SwitchConfig) -> Result<DynamicNotifier> {
        tracing::info!(notifier = %config.notifier, "creating notifier");

        let notifier: DynamicNotifier = match config.notifier {
            NotifierKind::DryRun => Box::new(DryRunNotifier),
            NotifierKind::Discord => {
                let url = config
                    .webhook_url
                    .clone()
                    .context("DISCORD_WEBHOOK_URL not set (or --webhook not provided)")?;

                Box::new(
                    DiscordWebhook::new(url, config.http_timeout, config.notify_retry)
                        .context("failed to build webhook http client")?,
                )
            }
        };

        Ok(notifier)
    }
}
