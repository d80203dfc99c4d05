//! CPU / memory total sparklines fed by the basic totals subscription.

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};

pub fn draw_total_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    label: &str,
    hist: &VecDeque<u64>,
    now: Option<f64>,
    color: Color,
) {
    let title = match now {
        Some(v) => format!("{label} (now: {v:>5.1}%)"),
        None => label.to_string(),
    };
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}
