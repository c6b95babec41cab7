pub mod errors;
#[cfg(test)]
pub mod fake_source;
pub mod quote_fetcher;
pub mod quote_source;
