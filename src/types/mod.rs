pub mod asset_pair;
pub mod decision;
pub mod holding;
pub mod price;
pub mod quote;
