//! Rates from the Frankfurter API (<https://www.frankfurter.app>).
//!
//! Latest: `GET /latest?from=USD&to=JPY` → `{"rates": {"JPY": 150.1}}`
//! History: `GET /2024-01-01..2024-01-31?from=USD&to=JPY`
//! → `{"rates": {"2024-01-02": {"JPY": 141.2}, ...}}`
//! Either may instead answer `{"error": "..."}` (or `{"message": "..."}`).

use crate::core::{
    CurrencyPair, FetchError, HistoryFetcher, HistorySeries, HistoryWindow, RateFetcher,
    RateSample,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure(ErrorBody),
    Success { rates: T },
}

type LatestRates = HashMap<String, f64>;
type DailyRates = BTreeMap<String, HashMap<String, f64>>;

pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("divisa/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_rates<T: DeserializeOwned>(
        &self,
        url: &str,
        pair: &CurrencyPair,
    ) -> Result<T, FetchError> {
        let url = format!("{url}?from={}&to={}", pair.base, pair.quote);
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::network(format!("Request error: {e} for {pair}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::network(format!("Failed to read response for {pair}: {e}")))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => FetchError::api(format!("HTTP {status} for {pair}: {}", body.error)),
                Err(_) => FetchError::api(format!("HTTP error: {status} for {pair}")),
            });
        }

        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(Envelope::Success { rates }) => Ok(rates),
            Ok(Envelope::Failure(body)) => Err(FetchError::api(body.error)),
            Err(e) => Err(FetchError::api(format!(
                "Failed to parse JSON response for {pair}: {e}"
            ))),
        }
    }
}

#[async_trait]
impl RateFetcher for FrankfurterProvider {
    #[instrument(name = "FrankfurterRateFetch", skip_all, fields(pair = %pair))]
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError> {
        let url = format!("{}/latest", self.base_url);
        let rates: LatestRates = self.get_rates(&url, pair).await?;

        let rate = rates
            .get(pair.quote.as_str())
            .copied()
            .ok_or_else(|| FetchError::api(format!("No rate data found for {pair}")))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(FetchError::api(format!("Invalid rate {rate} for {pair}")));
        }

        debug!(rate, "Fetched rate");
        Ok(rate)
    }
}

#[async_trait]
impl HistoryFetcher for FrankfurterProvider {
    #[instrument(name = "FrankfurterHistoryFetch", skip_all, fields(pair = %pair, window = %window))]
    async fn fetch_history(
        &self,
        pair: &CurrencyPair,
        window: HistoryWindow,
    ) -> Result<HistorySeries, FetchError> {
        let url = format!("{}/{}", self.base_url, window);
        let days: DailyRates = self.get_rates(&url, pair).await?;

        let mut samples = Vec::with_capacity(days.len());
        for (day, rates) in days {
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|_| FetchError::api(format!("Invalid date '{day}' in history for {pair}")))?;
            match rates.get(pair.quote.as_str()) {
                Some(value) => samples.push(RateSample {
                    date,
                    value: *value,
                }),
                None => debug!(%date, "No {} rate on this day", pair.quote),
            }
        }

        let series = HistorySeries::new(pair.clone(), window, samples);
        debug!(samples = series.len(), "Fetched history");
        Ok(series)
    }
}
