//! Line charts drawn as text on the terminal

use crate::core::{ChartSurface, LineChartSpec};
use console::{Term, style};
use tracing::debug;

pub const DEFAULT_CHART_HEIGHT: usize = 10;

/// Handle to a chart that has been written to the terminal.
#[derive(Debug)]
pub struct DrawnChart {
    id: u64,
    lines: usize,
}

/// Draws each chart below whatever was printed last. Printed output stays in
/// the scrollback, so disposing only releases the handle.
pub struct TerminalChart {
    term: Term,
    height: usize,
    next_id: u64,
}

impl TerminalChart {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            height: DEFAULT_CHART_HEIGHT,
            next_id: 1,
        }
    }
}

impl ChartSurface for TerminalChart {
    type Chart = DrawnChart;

    fn create(&mut self, spec: &LineChartSpec<'_>) -> anyhow::Result<DrawnChart> {
        let lines = plot(spec, self.height);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.term.write_line(&style(line).bold().to_string())?;
            } else {
                self.term.write_line(&style(line).cyan().to_string())?;
            }
        }
        let chart = DrawnChart {
            id: self.next_id,
            lines: lines.len(),
        };
        self.next_id += 1;
        Ok(chart)
    }

    fn dispose(&mut self, chart: DrawnChart) {
        debug!(id = chart.id, lines = chart.lines, "Released terminal chart");
    }
}

/// Surface for one-shot commands that fetch history without showing it.
#[derive(Debug, Default)]
pub struct HiddenChart;

impl ChartSurface for HiddenChart {
    type Chart = ();

    fn create(&mut self, spec: &LineChartSpec<'_>) -> anyhow::Result<()> {
        debug!(series = spec.series_label, "Chart not shown");
        Ok(())
    }

    fn dispose(&mut self, _chart: ()) {}
}

/// Lays out a chart as plain text lines: title, one line per height step
/// (max label on top, min at the bottom), then the first and last date.
pub fn plot(spec: &LineChartSpec<'_>, height: usize) -> Vec<String> {
    let mut lines = vec![spec.series_label.to_string()];
    if spec.values.is_empty() {
        lines.push("(no data)".to_string());
        return lines;
    }

    let height = height.max(2);
    let (min, max) = spec
        .values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    let levels: Vec<usize> = spec
        .values
        .iter()
        .map(|v| {
            if span > 0.0 {
                (((v - min) / span) * (height - 1) as f64).round() as usize
            } else {
                (height - 1) / 2
            }
        })
        .collect();

    let top = format!("{max:.4}");
    let bottom = format!("{min:.4}");
    let label_width = top.len().max(bottom.len());

    for row in (0..height).rev() {
        let axis = if row == height - 1 {
            top.as_str()
        } else if row == 0 {
            bottom.as_str()
        } else {
            ""
        };
        let cells: String = levels
            .iter()
            .map(|&level| if level == row { "• " } else { "  " })
            .collect();
        lines.push(format!("{axis:>label_width$} ┤ {}", cells.trim_end()));
    }

    match (spec.labels.first(), spec.labels.last()) {
        (Some(first), Some(last)) if spec.labels.len() > 1 => {
            let gap = (levels.len() * 2).saturating_sub(first.len() + last.len()).max(1);
            lines.push(format!("{:label_width$}   {first}{:gap$}{last}", "", ""));
        }
        (Some(only), _) => lines.push(format!("{:label_width$}   {only}", "")),
        _ => {}
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|d| format!("2024-01-{d:02}")).collect()
    }

    #[test]
    fn test_plot_places_extremes_on_outer_rows() {
        let labels = labels(3);
        let spec = LineChartSpec {
            labels: &labels,
            values: &[1.0, 2.0, 3.0],
            series_label: "USD/EUR",
        };
        let lines = plot(&spec, 3);

        assert_eq!(lines[0], "USD/EUR");
        assert_eq!(lines[1], "3.0000 ┤     •");
        assert_eq!(lines[2], "       ┤   •");
        assert_eq!(lines[3], "1.0000 ┤ •");
        assert!(lines[4].contains("2024-01-01"));
        assert!(lines[4].ends_with("2024-01-03"));
    }

    #[test]
    fn test_plot_flat_series_sits_in_the_middle() {
        let labels = labels(2);
        let spec = LineChartSpec {
            labels: &labels,
            values: &[1.5, 1.5],
            series_label: "USD/EUR",
        };
        let lines = plot(&spec, 5);
        assert_eq!(lines.len(), 1 + 5 + 1);
        assert!(lines[3].ends_with("• •"));
    }

    #[test]
    fn test_plot_empty_series() {
        let spec = LineChartSpec {
            labels: &[],
            values: &[],
            series_label: "USD/EUR",
        };
        assert_eq!(plot(&spec, 5), vec!["USD/EUR", "(no data)"]);
    }
}
