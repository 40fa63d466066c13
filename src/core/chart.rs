//! Chart rendering contract and the single-live-chart holder

use super::history::HistorySeries;
use tracing::{debug, warn};

pub trait ChartRenderer: Send {
    /// Redraws the chart. Labels and values are the same length, labels ascending.
    fn render(&mut self, labels: &[String], values: &[f64], series_label: &str);
}

/// Hands a history series to a renderer, labeled `BASE/QUOTE`.
pub fn render_series<R: ChartRenderer + ?Sized>(renderer: &mut R, series: &HistorySeries) {
    let labels = series.labels();
    let values = series.values();
    renderer.render(&labels, &values, &series.pair().to_string());
}

#[derive(Debug, Clone, Copy)]
pub struct LineChartSpec<'a> {
    pub labels: &'a [String],
    pub values: &'a [f64],
    pub series_label: &'a str,
}

/// Something that can draw line charts and must release them explicitly.
pub trait ChartSurface: Send {
    type Chart: Send;

    fn create(&mut self, spec: &LineChartSpec<'_>) -> anyhow::Result<Self::Chart>;
    fn dispose(&mut self, chart: Self::Chart);
}

/// Owns at most one live chart on a surface. The previous chart is disposed
/// before every new one is created, and on drop.
pub struct ScopedChart<S: ChartSurface> {
    surface: S,
    live: Option<S::Chart>,
}

impl<S: ChartSurface> ScopedChart<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            live: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn has_live_chart(&self) -> bool {
        self.live.is_some()
    }

    fn release(&mut self) {
        if let Some(chart) = self.live.take() {
            debug!("Disposing previous chart");
            self.surface.dispose(chart);
        }
    }
}

impl<S: ChartSurface> ChartRenderer for ScopedChart<S> {
    fn render(&mut self, labels: &[String], values: &[f64], series_label: &str) {
        self.release();

        if labels.len() != values.len() {
            warn!(
                labels = labels.len(),
                values = values.len(),
                series = series_label,
                "Chart labels and values differ in length, not rendering"
            );
            return;
        }

        let spec = LineChartSpec {
            labels,
            values,
            series_label,
        };
        match self.surface.create(&spec) {
            Ok(chart) => {
                debug!(series = series_label, points = values.len(), "Chart created");
                self.live = Some(chart);
            }
            Err(e) => warn!(error = %e, series = series_label, "Failed to create chart"),
        }
    }
}

impl<S: ChartSurface> Drop for ScopedChart<S> {
    fn drop(&mut self) {
        self.release();
    }
}
