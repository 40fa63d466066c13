//! Current exchange rate abstraction

use super::catalog::CurrencyPair;
use super::error::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Rate converting one unit of `pair.base` into `pair.quote`.
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError>;
}
