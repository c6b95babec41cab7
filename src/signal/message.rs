use chrono::DateTime;
use chrono_tz::Tz;

use crate::market::errors::FetchError;
use crate::types::asset_pair::AssetPair;
use crate::types::decision::{Action, Decision};
use crate::types::holding::Holding;
use crate::types::quote::Quote;

const TITLE: &str = "**Binary Switch Signal**";

/// Human-readable action line, phrased as an instruction at the open.
pub fn action_line(pair: &AssetPair, holding: Holding, action: Action) -> String {
    match action {
        Action::SwitchToB => format!(
            "Switch to **{}** (Sell {} @ open; Buy {})",
            pair.label_b, pair.label_a, pair.label_b
        ),
        Action::SwitchToA => format!(
            "Switch to **{}** (Sell {} @ open; Buy {})",
            pair.label_a, pair.label_b, pair.label_a
        ),
        Action::Hold => {
            let held = match holding {
                Holding::A => &pair.label_a,
                Holding::B => &pair.label_b,
            };
            format!("Hold **{held}** (inside hysteresis or not superior)")
        }
    }
}

pub fn signal_message(
    now: DateTime<Tz>,
    pair: &AssetPair,
    quotes: (&Quote, &Quote),
    holding: Holding,
    delta_bps: f64,
    decision: &Decision,
) -> String {
    let (quote_a, quote_b) = quotes;

    format!(
        "{TITLE} — {}\n\
         {} ({}) close/open: {} / {}  rA={:.2}%\n\
         {} ({}) close/open: {} / {}  rB={:.2}%\n\
         Edge (rB - rA): {:.1} bps   |   Holding: {}\n\
         Δ threshold: {:.1} bps\n\
         **Action**: {}",
        now.format("%Y-%m-%d %H:%M %Z"),
        pair.label_a,
        pair.ticker_a,
        quote_a.prior_close,
        quote_a.today_open,
        decision.return_a * 100.0,
        pair.label_b,
        pair.ticker_b,
        quote_b.prior_close,
        quote_b.today_open,
        decision.return_b * 100.0,
        decision.edge_bps,
        holding,
        delta_bps,
        action_line(pair, holding, decision.action),
    )
}

/// Degraded message posted when quotes could not be obtained.
pub fn failure_message(now: DateTime<Tz>, error: &FetchError) -> String {
    format!(
        "{TITLE} — {}\nCould not fetch data: {error}",
        now.format("%Y-%m-%d %H:%M %Z")
    )
}
