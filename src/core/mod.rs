//! Core conversion logic and abstractions

pub mod catalog;
pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod log;
pub mod rate;
pub mod session;
pub mod state;

// Re-export main types for cleaner imports
pub use catalog::{CurrencyCatalog, CurrencyCode, CurrencyInfo, CurrencyPair};
pub use chart::{ChartRenderer, ChartSurface, LineChartSpec, ScopedChart};
pub use controller::{ConversionController, Generation, RefreshPlan, Resolution};
pub use error::{CatalogError, FetchError};
pub use history::{HistoryFetcher, HistorySeries, HistoryWindow, RateSample};
pub use rate::RateFetcher;
pub use session::{CodeChange, FetchScheduler, Session, SessionEvent};
pub use state::ConversionState;
