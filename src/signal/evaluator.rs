use tracing::info;

use crate::types::asset_pair::AssetPair;
use crate::types::decision::{Action, Decision};
use crate::types::holding::Holding;
use crate::types::quote::Quote;

pub const BPS_PER_UNIT: f64 = 10_000.0;

/// Turns two overnight returns and the current holding into a switch/hold
/// decision with hysteresis.
///
/// The threshold is compared strictly: an edge exactly equal to `delta_bps`
/// holds.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    pair: AssetPair,
    delta_bps: f64,
}

impl SignalEvaluator {
    pub fn new(pair: AssetPair, delta_bps: f64) -> Self {
        Self { pair, delta_bps }
    }

    pub fn delta_bps(&self) -> f64 {
        self.delta_bps
    }

    pub fn evaluate(&self, quote_a: &Quote, quote_b: &Quote, holding: Holding) -> Decision {
        let return_a = quote_a.overnight_return();
        let return_b = quote_b.overnight_return();
        let edge_bps = (return_b - return_a) * BPS_PER_UNIT;

        let action = match holding {
            Holding::A if edge_bps > self.delta_bps => Action::SwitchToB,
            Holding::B if -edge_bps > self.delta_bps => Action::SwitchToA,
            _ => Action::Hold,
        };

        let rationale = self.rationale(return_a, return_b, edge_bps, holding, action);

        info!(
            edge_bps,
            return_a,
            return_b,
            delta_bps = self.delta_bps,
            %holding,
            %action,
            "signal evaluated"
        );

        Decision {
            edge_bps,
            return_a,
            return_b,
            action,
            rationale,
        }
    }

    fn rationale(
        &self,
        return_a: f64,
        return_b: f64,
        edge_bps: f64,
        holding: Holding,
        action: Action,
    ) -> String {
        let pair = &self.pair;
        let returns = format!(
            "{} ({}) r={:.2}%, {} ({}) r={:.2}%",
            pair.label_a,
            pair.ticker_a,
            return_a * 100.0,
            pair.label_b,
            pair.ticker_b,
            return_b * 100.0,
        );

        /* edge seen from the asset we would switch into */
        let relevant_edge = match holding {
            Holding::A => edge_bps,
            Holding::B => -edge_bps,
        };

        let verdict = match action {
            Action::SwitchToB => format!(
                "{} leads {} by {:.1} bps > Δ {:.1} bps",
                pair.label_b, pair.label_a, relevant_edge, self.delta_bps
            ),
            Action::SwitchToA => format!(
                "{} leads {} by {:.1} bps > Δ {:.1} bps",
                pair.label_a, pair.label_b, relevant_edge, self.delta_bps
            ),
            Action::Hold if relevant_edge > 0.0 => format!(
                "edge {:.1} bps inside hysteresis (<= Δ {:.1} bps)",
                relevant_edge, self.delta_bps
            ),
            Action::Hold => format!(
                "edge {:.1} bps favours staying (Δ {:.1} bps)",
                relevant_edge, self.delta_bps
            ),
        };

        format!("{returns}; {verdict}")
    }
}
