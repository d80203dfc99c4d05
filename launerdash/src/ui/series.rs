//! Multi-line time series chart, one line per metric key.

use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::adapters::{series_keys, SeriesPoint};
use crate::ui::theme::{series_color, MUTED};

/// Y range: `Some(max)` pins it (percent totals), `None` fits the data.
pub fn draw_series_chart(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    points: &[SeriesPoint],
    y_max: Option<f64>,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    if points.is_empty() {
        let p = Paragraph::new(Span::styled("no samples yet", Style::default().fg(MUTED)))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let keys = series_keys(points);
    // Points missing a key leave a gap for that line
    let lines: Vec<Vec<(f64, f64)>> = keys
        .iter()
        .map(|k| {
            points
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.get(k).map(|v| (i as f64, v)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = keys
        .iter()
        .zip(lines.iter())
        .enumerate()
        .map(|(i, (k, data))| {
            Dataset::default()
                .name(k.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(data)
        })
        .collect();

    let top = y_max.unwrap_or_else(|| fit_max(&lines));
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let first = points.first().map(|p| p.time.clone()).unwrap_or_default();
    let last = points.last().map(|p| p.time.clone()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)])
                .style(Style::default().fg(MUTED)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, top])
                .labels(vec![Span::raw("0"), Span::raw(format!("{top:.0}")).bold()])
                .style(Style::default().fg(MUTED)),
        );
    f.render_widget(chart, area);
}

fn fit_max(lines: &[Vec<(f64, f64)>]) -> f64 {
    let max = lines
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);
    (max * 1.1).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_max_pads_and_floors() {
        assert_eq!(fit_max(&[]), 1.0);
        let lines = vec![vec![(0.0, 10.0), (1.0, 20.0)], vec![(0.0, 5.0)]];
        assert!((fit_max(&lines) - 22.0).abs() < 1e-9);
    }
}
