use super::chart::TerminalChart;
use super::ui;
use crate::core::chart::render_series;
use crate::core::config::AppConfig;
use crate::core::history::MAX_WINDOW_DAYS;
use crate::core::session::with_timeout;
use crate::core::{CurrencyCatalog, HistoryFetcher, HistorySeries, HistoryWindow, ScopedChart};
use crate::providers::FrankfurterProvider;
use anyhow::{Context, Result, ensure};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info;

/// One row per day with the change against the previous published day.
pub fn series_table(series: &HistorySeries) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Change %"),
    ]);

    let mut previous: Option<f64> = None;
    for sample in series.samples() {
        let change = match previous {
            Some(prev) => ui::change_cell((sample.value - prev) / prev * 100.0),
            None => ui::na_cell(),
        };
        table.add_row(vec![
            Cell::new(sample.date.format("%Y-%m-%d")),
            Cell::new(format!("{:.4}", sample.value)).set_alignment(CellAlignment::Right),
            change,
        ]);
        previous = Some(sample.value);
    }
    table
}

pub async fn run(
    config: &AppConfig,
    catalog: &CurrencyCatalog,
    base: Option<&str>,
    quote: Option<&str>,
    days: Option<u32>,
) -> Result<()> {
    let pair = config.initial_pair(catalog, base, quote)?;
    let days = days.unwrap_or(config.history_days);
    ensure!(
        (1..=MAX_WINDOW_DAYS).contains(&days),
        "--days must be between 1 and {MAX_WINDOW_DAYS}, got {days}"
    );
    let window = HistoryWindow::ending_today(days);
    let provider = FrankfurterProvider::new(config.api_base_url())?;

    let pb = ui::new_spinner(&format!("Fetching {pair} for {window}"));
    let result = with_timeout(config.request_timeout(), provider.fetch_history(&pair, window)).await;
    pb.finish_and_clear();
    let series = result.with_context(|| format!("Could not fetch history for {pair}"))?;
    info!(%pair, %window, samples = series.len(), "Fetched history");

    println!(
        "{} {}",
        ui::style_text(&pair.to_string(), ui::StyleType::Title),
        ui::style_text(&window.to_string(), ui::StyleType::Subtle)
    );
    if series.is_empty() {
        println!("No rates published for {pair} in this window.");
        return Ok(());
    }
    println!("{}", series_table(&series));

    ui::print_separator();
    let mut chart = ScopedChart::new(TerminalChart::stdout());
    render_series(&mut chart, &series);
    Ok(())
}
