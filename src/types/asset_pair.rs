/// The two tracked assets and their display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPair {
    pub ticker_a: String,
    pub ticker_b: String,
    pub label_a: String,
    pub label_b: String,
}

impl AssetPair {
    pub fn new(
        ticker_a: impl Into<String>,
        ticker_b: impl Into<String>,
        label_a: impl Into<String>,
        label_b: impl Into<String>,
    ) -> Self {
        Self {
            ticker_a: ticker_a.into(),
            ticker_b: ticker_b.into(),
            label_a: label_a.into(),
            label_b: label_b.into(),
        }
    }
}
