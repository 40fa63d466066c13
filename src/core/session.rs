//! Effect layer around [`ConversionController`]
//!
//! `FetchScheduler` turns refresh plans into spawned fetch tasks; each task
//! reports back on a channel as a [`SessionEvent`]. `Session` applies those
//! events to the controller one at a time on the caller's task, so all state
//! mutation stays on a single logical thread.

use super::catalog::CurrencyCode;
use super::chart::ChartRenderer;
use super::controller::{
    ConversionController, Generation, HistoryRequest, RateRequest, RefreshPlan, Resolution,
};
use super::error::FetchError;
use super::history::{HistoryFetcher, HistorySeries, HistoryWindow};
use super::rate::RateFetcher;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum SessionEvent {
    Rate {
        generation: Generation,
        result: Result<f64, FetchError>,
    },
    History {
        generation: Generation,
        result: Result<HistorySeries, FetchError>,
    },
}

/// Runs `fetch`, reporting expiry of `limit` as a network error.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::network(format!(
            "request timed out after {:.1}s",
            limit.as_secs_f64()
        ))),
    }
}

#[derive(Clone)]
pub struct FetchScheduler {
    rates: Arc<dyn RateFetcher>,
    history: Arc<dyn HistoryFetcher>,
    timeout: Duration,
    events: UnboundedSender<SessionEvent>,
}

impl FetchScheduler {
    pub fn new(
        rates: Arc<dyn RateFetcher>,
        history: Arc<dyn HistoryFetcher>,
        timeout: Duration,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = unbounded_channel();
        let scheduler = Self {
            rates,
            history,
            timeout,
            events,
        };
        (scheduler, receiver)
    }

    pub fn dispatch(&self, plan: RefreshPlan) {
        self.spawn_rate(plan.rate);
        self.spawn_history(plan.history);
    }

    fn spawn_rate(&self, request: RateRequest) {
        let fetcher = Arc::clone(&self.rates);
        let events = self.events.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let result = with_timeout(timeout, fetcher.fetch_rate(&request.pair)).await;
            // A closed channel means the session ended; nobody wants the result.
            let _ = events.send(SessionEvent::Rate {
                generation: request.generation,
                result,
            });
        });
    }

    fn spawn_history(&self, request: HistoryRequest) {
        let fetcher = Arc::clone(&self.history);
        let events = self.events.clone();
        let timeout = self.timeout;
        let window = HistoryWindow::ending_today(request.window_days);
        tokio::spawn(async move {
            let result = with_timeout(timeout, fetcher.fetch_history(&request.pair, window)).await;
            let _ = events.send(SessionEvent::History {
                generation: request.generation,
                result,
            });
        });
    }
}

/// Outcome of a currency selector change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChange {
    Issued,
    /// A rate fetch is still outstanding, so selectors are disabled.
    Busy,
}

pub struct Session<C: ChartRenderer> {
    controller: ConversionController<C>,
    scheduler: FetchScheduler,
}

impl<C: ChartRenderer> Session<C> {
    pub fn new(controller: ConversionController<C>, scheduler: FetchScheduler) -> Self {
        Self {
            controller,
            scheduler,
        }
    }

    pub fn controller(&self) -> &ConversionController<C> {
        &self.controller
    }

    /// Issues the initial rate and history fetches.
    pub fn start(&mut self) {
        let plan = self.controller.refresh();
        self.scheduler.dispatch(plan);
    }

    pub fn set_base_code(&mut self, code: CurrencyCode) -> CodeChange {
        if self.controller.state().loading() {
            return CodeChange::Busy;
        }
        let plan = self.controller.set_base_code(code);
        self.scheduler.dispatch(plan);
        CodeChange::Issued
    }

    pub fn set_quote_code(&mut self, code: CurrencyCode) -> CodeChange {
        if self.controller.state().loading() {
            return CodeChange::Busy;
        }
        let plan = self.controller.set_quote_code(code);
        self.scheduler.dispatch(plan);
        CodeChange::Issued
    }

    pub fn edit_base_amount(&mut self, raw: &str) {
        self.controller.edit_base_amount(raw);
    }

    pub fn edit_quote_amount(&mut self, raw: &str) {
        self.controller.edit_quote_amount(raw);
    }

    pub fn apply(&mut self, event: SessionEvent) -> Resolution {
        let resolution = match event {
            SessionEvent::Rate { generation, result } => {
                self.controller.on_rate_result(generation, result)
            }
            SessionEvent::History { generation, result } => {
                self.controller.on_history_result(generation, result)
            }
        };
        debug!(?resolution, "Applied session event");
        resolution
    }

    /// Applies events until no request is outstanding.
    pub async fn settle(&mut self, events: &mut UnboundedReceiver<SessionEvent>) {
        while !self.controller.is_idle() {
            match events.recv().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
    }
}
