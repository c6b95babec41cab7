pub mod yahoo_chart;
pub mod yahoo_source;
