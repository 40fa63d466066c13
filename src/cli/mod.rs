//! Terminal front end

pub mod chart;
pub mod convert;
pub mod currencies;
pub mod history;
pub mod rate;
pub mod setup;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::{
    ChartSurface, ConversionController, CurrencyPair, FetchScheduler, ScopedChart, Session,
    SessionEvent,
};
use crate::providers::FrankfurterProvider;
use anyhow::Result;
use chart::TerminalChart;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub type TerminalSession = Session<ScopedChart<TerminalChart>>;

/// Wires a session for `pair` to the configured API and the terminal chart.
pub fn terminal_session(
    config: &AppConfig,
    pair: CurrencyPair,
) -> Result<(TerminalSession, UnboundedReceiver<SessionEvent>)> {
    session_on(config, pair, TerminalChart::stdout())
}

/// Wires a session for `pair` to the configured API, drawing on `surface`.
pub fn session_on<S: ChartSurface>(
    config: &AppConfig,
    pair: CurrencyPair,
    surface: S,
) -> Result<(Session<ScopedChart<S>>, UnboundedReceiver<SessionEvent>)> {
    let provider = Arc::new(FrankfurterProvider::new(config.api_base_url())?);
    let (scheduler, events) =
        FetchScheduler::new(provider.clone(), provider, config.request_timeout());
    let controller = ConversionController::new(
        pair.base,
        pair.quote,
        config.history_days,
        ScopedChart::new(surface),
    );
    Ok((Session::new(controller, scheduler), events))
}
