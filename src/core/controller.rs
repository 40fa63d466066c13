//! Conversion orchestration
//!
//! The controller is synchronous: operations mutate [`ConversionState`] and
//! return the fetches that should be issued, and fetch outcomes are fed back
//! through `on_rate_result` / `on_history_result`. Each of the two slots
//! (rate, history) stamps its requests with a generation, and only a result
//! carrying the slot's latest generation is applied. Anything older was
//! superseded by a later code change and is dropped.

use super::catalog::{CurrencyCode, CurrencyPair};
use super::chart::{ChartRenderer, render_series};
use super::error::FetchError;
use super::history::HistorySeries;
use super::state::ConversionState;
use std::fmt::Display;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct RequestSlot {
    generation: Generation,
    pending: bool,
}

impl RequestSlot {
    fn issue(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.pending = true;
        self.generation
    }

    /// True when `generation` is the outstanding request of this slot.
    fn accept(&mut self, generation: Generation) -> bool {
        if self.pending && generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub generation: Generation,
    pub pair: CurrencyPair,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub generation: Generation,
    pub pair: CurrencyPair,
    pub window_days: u32,
}

/// Fetches to issue after a code change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPlan {
    pub rate: RateRequest,
    pub history: HistoryRequest,
}

/// What happened to a fetch result handed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Applied,
    Failed(FetchError),
    Stale,
}

pub struct ConversionController<C: ChartRenderer> {
    state: ConversionState,
    rate_slot: RequestSlot,
    history_slot: RequestSlot,
    window_days: u32,
    chart: C,
    series: Option<HistorySeries>,
    notice: Option<String>,
}

impl<C: ChartRenderer> ConversionController<C> {
    pub fn new(base: CurrencyCode, quote: CurrencyCode, window_days: u32, chart: C) -> Self {
        Self {
            state: ConversionState::new(base, quote),
            rate_slot: RequestSlot::default(),
            history_slot: RequestSlot::default(),
            window_days,
            chart,
            series: None,
            notice: None,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Last accepted history series, i.e. what the chart currently shows.
    pub fn series(&self) -> Option<&HistorySeries> {
        self.series.as_ref()
    }

    /// Non-blocking message about the fetches that failed since the last
    /// refresh, one line each.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// No request is outstanding in either slot.
    pub fn is_idle(&self) -> bool {
        !self.rate_slot.pending && !self.history_slot.pending
    }

    /// Requests rate and history for the current pair.
    pub fn refresh(&mut self) -> RefreshPlan {
        let pair = self.state.pair();
        let rate = RateRequest {
            generation: self.rate_slot.issue(),
            pair: pair.clone(),
        };
        let history = HistoryRequest {
            generation: self.history_slot.issue(),
            pair,
            window_days: self.window_days,
        };
        self.state.set_loading(true);
        self.notice = None;
        debug!(
            pair = %rate.pair,
            rate_generation = %rate.generation,
            history_generation = %history.generation,
            "Refresh issued"
        );
        RefreshPlan { rate, history }
    }

    pub fn set_base_code(&mut self, code: CurrencyCode) -> RefreshPlan {
        self.state.set_base_code(code);
        self.refresh()
    }

    pub fn set_quote_code(&mut self, code: CurrencyCode) -> RefreshPlan {
        self.state.set_quote_code(code);
        self.refresh()
    }

    pub fn on_rate_result(
        &mut self,
        generation: Generation,
        result: Result<f64, FetchError>,
    ) -> Resolution {
        if !self.rate_slot.accept(generation) {
            debug!(%generation, current = %self.rate_slot.generation, "Dropping stale rate result");
            return Resolution::Stale;
        }

        match result {
            Ok(rate) => {
                self.state.apply_rate(rate);
                Resolution::Applied
            }
            Err(e) => {
                self.state.set_loading(false);
                warn!(error = %e, pair = %self.state.pair(), "Rate fetch failed");
                self.push_notice(format!("Could not refresh rate: {e}"));
                Resolution::Failed(e)
            }
        }
    }

    pub fn on_history_result(
        &mut self,
        generation: Generation,
        result: Result<HistorySeries, FetchError>,
    ) -> Resolution {
        if !self.history_slot.accept(generation) {
            debug!(%generation, current = %self.history_slot.generation, "Dropping stale history result");
            return Resolution::Stale;
        }

        match result {
            Ok(series) => {
                render_series(&mut self.chart, &series);
                self.series = Some(series);
                Resolution::Applied
            }
            Err(e) => {
                warn!(error = %e, pair = %self.state.pair(), "History fetch failed");
                self.push_notice(format!("Could not refresh history: {e}"));
                Resolution::Failed(e)
            }
        }
    }

    fn push_notice(&mut self, message: String) {
        match &mut self.notice {
            Some(notice) => {
                notice.push('\n');
                notice.push_str(&message);
            }
            None => self.notice = Some(message),
        }
    }

    pub fn edit_base_amount(&mut self, raw: &str) {
        self.state.edit_base_amount(raw);
    }

    pub fn edit_quote_amount(&mut self, raw: &str) {
        self.state.edit_quote_amount(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CurrencyCatalog;
    use crate::core::chart::ScopedChart;
    use crate::core::chart::testing::RecordingSurface;
    use crate::core::history::{HistoryWindow, RateSample};
    use chrono::NaiveDate;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCatalog::builtin().code(raw).unwrap()
    }

    fn controller() -> (
        ConversionController<ScopedChart<RecordingSurface>>,
        RecordingSurface,
    ) {
        let surface = RecordingSurface::default();
        let controller =
            ConversionController::new(code("USD"), code("JPY"), 30, ScopedChart::new(surface.clone()));
        (controller, surface)
    }

    fn series(pair: &CurrencyPair, values: &[f64]) -> HistorySeries {
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = HistoryWindow::trailing(end, 30);
        let samples = values.iter().enumerate().map(|(i, v)| RateSample {
            date: end - chrono::Duration::days((values.len() - 1 - i) as i64),
            value: *v,
        });
        HistorySeries::new(pair.clone(), window, samples)
    }

    #[test]
    fn test_refresh_stamps_new_generations_and_sets_loading() {
        let (mut controller, _) = controller();
        let first = controller.refresh();
        assert_eq!(first.rate.generation.value(), 1);
        assert_eq!(first.history.generation.value(), 1);
        assert_eq!(first.history.window_days, 30);
        assert!(controller.state().loading());

        let second = controller.set_quote_code(code("EUR"));
        assert_eq!(second.rate.generation.value(), 2);
        assert_eq!(second.history.generation.value(), 2);
        assert_eq!(second.rate.pair.to_string(), "USD/EUR");
        assert!(!controller.is_idle());
    }

    #[test]
    fn test_rate_success_resets_amounts() {
        let (mut controller, _) = controller();
        let plan = controller.refresh();

        let resolution = controller.on_rate_result(plan.rate.generation, Ok(150.0));
        assert_eq!(resolution, Resolution::Applied);

        let state = controller.state();
        assert_eq!(state.rate(), Some(150.0));
        assert_eq!(state.base_amount(), "1");
        assert_eq!(state.quote_amount(), "150.000");
        assert!(!state.loading());

        controller.edit_base_amount("2");
        assert_eq!(controller.state().quote_amount(), "300.000");
        controller.edit_quote_amount("450");
        assert_eq!(controller.state().base_amount(), "3.000");
    }

    #[test]
    fn test_rate_failure_clears_loading_and_keeps_rate() {
        let (mut controller, _) = controller();
        let plan = controller.refresh();
        controller.on_rate_result(plan.rate.generation, Ok(150.0));
        controller.edit_base_amount("2");

        let plan = controller.set_quote_code(code("EUR"));
        assert!(controller.state().loading());
        let resolution = controller.on_rate_result(
            plan.rate.generation,
            Err(FetchError::network("connection reset")),
        );

        assert!(matches!(resolution, Resolution::Failed(FetchError::Network(_))));
        let state = controller.state();
        assert!(!state.loading());
        assert_eq!(state.rate(), Some(150.0));
        assert_eq!(state.base_amount(), "2");
        assert_eq!(state.quote_amount(), "300.000");
        assert!(controller.notice().unwrap().contains("connection reset"));
    }

    #[test]
    fn test_out_of_order_results_reflect_latest_pair() {
        let (mut controller, surface) = controller();
        let p1 = controller.set_base_code(code("EUR"));
        let p2 = controller.set_base_code(code("GBP"));

        // P2 resolves first, P1 straggles in afterwards.
        assert_eq!(
            controller.on_rate_result(p2.rate.generation, Ok(190.0)),
            Resolution::Applied
        );
        assert_eq!(
            controller.on_history_result(p2.history.generation, Ok(series(&p2.history.pair, &[188.0, 190.0]))),
            Resolution::Applied
        );
        assert_eq!(
            controller.on_rate_result(p1.rate.generation, Ok(160.0)),
            Resolution::Stale
        );
        assert_eq!(
            controller.on_history_result(p1.history.generation, Ok(series(&p1.history.pair, &[158.0, 160.0]))),
            Resolution::Stale
        );

        assert_eq!(controller.state().rate(), Some(190.0));
        assert_eq!(controller.state().quote_amount(), "190.000");
        assert_eq!(controller.series().unwrap().pair().to_string(), "GBP/JPY");

        let log = surface.log.lock().unwrap();
        assert_eq!(log.created, 1);
        assert_eq!(log.last_label.as_deref(), Some("GBP/JPY"));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_stale_rate_does_not_touch_loading() {
        let (mut controller, _) = controller();
        let p1 = controller.refresh();
        let _p2 = controller.set_quote_code(code("EUR"));

        assert_eq!(
            controller.on_rate_result(p1.rate.generation, Ok(150.0)),
            Resolution::Stale
        );
        assert!(controller.state().loading());
        assert!(controller.state().rate().is_none());
    }

    #[test]
    fn test_stale_failure_is_not_reported() {
        let (mut controller, _) = controller();
        let p1 = controller.refresh();
        let _p2 = controller.refresh();

        let resolution =
            controller.on_rate_result(p1.rate.generation, Err(FetchError::api("boom")));
        assert_eq!(resolution, Resolution::Stale);
        assert!(controller.notice().is_none());
    }

    #[test]
    fn test_duplicate_result_is_ignored() {
        let (mut controller, _) = controller();
        let plan = controller.refresh();
        controller.on_rate_result(plan.rate.generation, Ok(150.0));
        controller.edit_base_amount("3");

        assert_eq!(
            controller.on_rate_result(plan.rate.generation, Ok(151.0)),
            Resolution::Stale
        );
        assert_eq!(controller.state().base_amount(), "3");
    }

    #[test]
    fn test_history_failure_leaves_chart_untouched() {
        let (mut controller, surface) = controller();
        let plan = controller.refresh();
        controller.on_history_result(plan.history.generation, Ok(series(&plan.history.pair, &[149.0, 150.0])));

        let plan = controller.refresh();
        let resolution = controller
            .on_history_result(plan.history.generation, Err(FetchError::api("not found")));

        assert!(matches!(resolution, Resolution::Failed(FetchError::Api(_))));
        assert!(controller.chart().has_live_chart());
        assert_eq!(controller.series().unwrap().values(), vec![149.0, 150.0]);
        let log = surface.log.lock().unwrap();
        assert_eq!(log.created, 1);
        assert_eq!(log.disposed, 0);
    }

    #[test]
    fn test_history_success_renders_labeled_series() {
        let (mut controller, surface) = controller();
        let plan = controller.refresh();
        controller.on_history_result(
            plan.history.generation,
            Ok(series(&plan.history.pair, &[149.0, 150.0, 151.0])),
        );

        let log = surface.log.lock().unwrap();
        assert_eq!(log.last_label.as_deref(), Some("USD/JPY"));
        assert_eq!(
            log.last_points,
            vec![
                ("2024-01-29".to_string(), 149.0),
                ("2024-01-30".to_string(), 150.0),
                ("2024-01-31".to_string(), 151.0),
            ]
        );
    }

    #[test]
    fn test_both_failures_are_reported_until_next_refresh() {
        let (mut controller, _) = controller();
        let plan = controller.refresh();
        controller.on_history_result(plan.history.generation, Err(FetchError::api("HTTP 404")));
        controller.on_rate_result(plan.rate.generation, Err(FetchError::network("offline")));

        let notice = controller.notice().unwrap();
        assert!(notice.contains("Could not refresh history: API error: HTTP 404"));
        assert!(notice.contains("Could not refresh rate: Network error: offline"));

        controller.refresh();
        assert!(controller.notice().is_none());
    }
}
