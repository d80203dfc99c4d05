//! Usage panel: used/free gauge, ranked entries and the hourly/daily/weekly averages.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

use crate::adapters::{per_entity, pie_pair, UsageSnapshot};
use crate::ui::theme::{MUTED, USED};
use crate::ui::util::{fmt_avg, fmt_pct, truncate_middle};

pub fn draw_usage_panel(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    snap: Option<&UsageSnapshot>,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);
    let Some(s) = snap else {
        f.render_widget(
            Paragraph::new(Span::styled("waiting for data...", Style::default().fg(MUTED))),
            inner,
        );
        return;
    };
    if inner.height < 3 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // used/free
            Constraint::Min(1),    // entries
            Constraint::Length(3), // averages
        ])
        .split(inner);

    let [used, free] = pie_pair(s.total_usage);
    let g = Gauge::default()
        .gauge_style(Style::default().fg(USED).bg(Color::DarkGray))
        .ratio(used.value / 100.0)
        .label(format!(
            "{} {} / {} {}",
            used.label,
            fmt_pct(used.value),
            free.label,
            fmt_pct(free.value)
        ));
    f.render_widget(g, rows[0]);

    let name_w = (rows[1].width as usize).saturating_sub(10);
    let items: Vec<ListItem> = per_entity(&s.top_entries)
        .into_iter()
        .enumerate()
        .take(rows[1].height as usize)
        .map(|(i, e)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:>2}. ", i + 1)),
                Span::raw(format!("{:<w$}", truncate_middle(&e.name, name_w), w = name_w)),
                match e.value {
                    Some(v) => Span::styled(
                        format!("{v:>6.2}%"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(format!("{:>7}", "n/a"), Style::default().fg(MUTED)),
                },
            ]))
        })
        .collect();
    f.render_widget(List::new(items), rows[1]);

    let avgs = vec![
        Line::from(format!("Last hourly: {}", fmt_avg(s.hourly_avg))),
        Line::from(format!("Last daily:  {}", fmt_avg(s.daily_avg))),
        Line::from(format!("Last weekly: {}", fmt_avg(s.weekly_avg))),
    ];
    f.render_widget(Paragraph::new(avgs).style(Style::default().fg(MUTED)), rows[2]);
}

/// One-line placeholder while the real-time panel is collapsed.
pub fn draw_collapsed(f: &mut ratatui::Frame<'_>, area: Rect) {
    let p = Paragraph::new(Span::styled(
        "press 'r' to expand",
        Style::default().fg(MUTED),
    ))
    .block(Block::default().borders(Borders::ALL).title("Real-time"));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Entry;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn absent_entry_value_renders_as_na() {
        let snap = UsageSnapshot {
            total_usage: 20.0,
            top_entries: vec![
                Entry { name: "java".into(), value: Some(12.5) },
                Entry { name: "cron".into(), value: None },
            ],
            hourly_avg: None,
            daily_avg: Some(18.0),
            weekly_avg: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_usage_panel(f, area, "CPU usage", Some(&snap))
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("12.50%"));
        assert!(text.contains("n/a"));
        assert!(text.contains("No data available"));
    }
}
