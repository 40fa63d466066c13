//! Historical rate series and the fetcher abstraction

use super::catalog::CurrencyPair;
use super::error::FetchError;
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Display;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Longest window accepted from the command line or the config file.
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Inclusive range of calendar days `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl HistoryWindow {
    /// `[end - days, end]`, with `days` capped at [`MAX_WINDOW_DAYS`]. The
    /// start saturates at the earliest representable date.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let days = Days::new(u64::from(days.min(MAX_WINDOW_DAYS)));
        Self {
            start: end.checked_sub_days(days).unwrap_or(NaiveDate::MIN),
            end,
        }
    }

    /// Trailing window ending on today's date in the local clock.
    pub fn ending_today(days: u32) -> Self {
        Self::trailing(Local::now().date_naive(), days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for HistoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily rates for one pair, ascending by date with at most one sample per day.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySeries {
    pair: CurrencyPair,
    window: HistoryWindow,
    samples: Vec<RateSample>,
}

impl HistorySeries {
    /// Keeps samples inside the window with a positive value. On repeated
    /// dates the later sample wins.
    pub fn new(
        pair: CurrencyPair,
        window: HistoryWindow,
        samples: impl IntoIterator<Item = RateSample>,
    ) -> Self {
        let by_date: BTreeMap<NaiveDate, f64> = samples
            .into_iter()
            .filter(|s| window.contains(s.date) && s.value.is_finite() && s.value > 0.0)
            .map(|s| (s.date, s.value))
            .collect();

        Self {
            pair,
            window,
            samples: by_date
                .into_iter()
                .map(|(date, value)| RateSample { date, value })
                .collect(),
        }
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn window(&self) -> HistoryWindow {
        self.window
    }

    pub fn samples(&self) -> &[RateSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Dates as `YYYY-MM-DD`, for chart labels.
    pub fn labels(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|s| s.date.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    async fn fetch_history(
        &self,
        pair: &CurrencyPair,
        window: HistoryWindow,
    ) -> Result<HistorySeries, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CurrencyCatalog;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn usd_eur() -> CurrencyPair {
        let catalog = CurrencyCatalog::builtin();
        CurrencyPair::new(catalog.code("USD").unwrap(), catalog.code("EUR").unwrap())
    }

    #[test]
    fn test_trailing_window_spans_thirty_days() {
        let window = HistoryWindow::trailing(date("2024-03-10"), DEFAULT_WINDOW_DAYS);
        assert_eq!(window.start(), date("2024-02-09"));
        assert_eq!(window.end(), date("2024-03-10"));
        assert_eq!(window.to_string(), "2024-02-09..2024-03-10");
        assert!(window.contains(date("2024-02-09")));
        assert!(window.contains(date("2024-03-10")));
        assert!(!window.contains(date("2024-03-11")));
    }

    #[test]
    fn test_oversized_window_is_capped() {
        let window = HistoryWindow::ending_today(u32::MAX);
        assert_eq!(
            (window.end() - window.start()).num_days(),
            i64::from(MAX_WINDOW_DAYS)
        );

        let early = NaiveDate::MIN + Days::new(5);
        let window = HistoryWindow::trailing(early, 30);
        assert_eq!(window.start(), NaiveDate::MIN);
        assert_eq!(window.end(), early);
    }

    #[test]
    fn test_series_is_sorted_and_deduplicated() {
        let window = HistoryWindow::trailing(date("2024-01-31"), 30);
        let series = HistorySeries::new(
            usd_eur(),
            window,
            vec![
                RateSample { date: date("2024-01-15"), value: 0.91 },
                RateSample { date: date("2024-01-03"), value: 0.90 },
                RateSample { date: date("2024-01-15"), value: 0.92 },
                RateSample { date: date("2023-12-01"), value: 0.95 },
                RateSample { date: date("2024-01-20"), value: 0.0 },
            ],
        );

        assert_eq!(series.labels(), vec!["2024-01-03", "2024-01-15"]);
        assert_eq!(series.values(), vec![0.90, 0.92]);
        assert!(
            series
                .samples()
                .windows(2)
                .all(|pair| pair[0].date < pair[1].date)
        );
    }
}
