use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchToA,
    SwitchToB,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchToA => write!(f, "SWITCH_TO_A"),
            Self::SwitchToB => write!(f, "SWITCH_TO_B"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Result of one evaluation. Computed fresh each run and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// `(r_B - r_A) * 10_000`; positive favours B.
    pub edge_bps: f64,
    pub return_a: f64,
    pub return_b: f64,
    pub action: Action,
    pub rationale: String,
}
